//! Class instances: own fields plus dispatch through the class's member chain

use crate::class::{receiver, Class};
use crate::error::{ObjectError, ObjectResult};
use crate::value::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Property name resolving to the instance's class
pub const CLASS_PROPERTY: &str = "class";

/// Property name resolving to the bound `instanceof` predicate
pub const INSTANCEOF_PROPERTY: &str = "instanceof";

/// An object bound to exactly one class for its whole lifetime.
///
/// Cheap to clone: clones share the same object. Equality is identity.
#[derive(Clone)]
pub struct Instance(Arc<InstanceInner>);

struct InstanceInner {
    class: Class,
    fields: RwLock<FxHashMap<String, Value>>,
}

impl Instance {
    /// Allocate an instance without running any constructor.
    /// Use [`Class::construct`] to build initialized instances.
    pub(crate) fn new(class: Class) -> Self {
        Instance(Arc::new(InstanceInner {
            class,
            fields: RwLock::new(FxHashMap::default()),
        }))
    }

    /// Class this instance was constructed from
    #[inline]
    pub fn class(&self) -> &Class {
        &self.0.class
    }

    /// Check whether this instance's class is `target` or extends it
    pub fn instanceof(&self, target: &Class) -> bool {
        self.class().is_subclass_of(target)
    }

    /// Property read.
    ///
    /// Resolution order: the reserved names `class` and `instanceof`, then
    /// own fields, then the class's member chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            CLASS_PROPERTY => Some(Value::Class(self.class().clone())),
            INSTANCEOF_PROPERTY => Some(self.instanceof_predicate()),
            _ => self.get_own(name).or_else(|| self.class().members().get(name)),
        }
    }

    /// Own field, ignoring the class's members
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    /// Write an own field. Writing `Nil` removes it, exposing the member
    /// of the same name again.
    pub fn set(&self, name: &str, value: Value) -> ObjectResult<()> {
        if name == CLASS_PROPERTY || name == INSTANCEOF_PROPERTY {
            return Err(ObjectError::ReservedName {
                name: name.to_string(),
                target: format!("{} instance", self.class().name()),
            });
        }

        let mut fields = self.0.fields.write();
        if value.is_nil() {
            fields.remove(name);
        } else {
            fields.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Names of own fields
    pub fn field_names(&self) -> Vec<String> {
        self.0.fields.read().keys().cloned().collect()
    }

    /// Resolve `name` and call it with this instance as the first argument
    pub fn call_method(&self, name: &str, args: &[Value]) -> ObjectResult<Value> {
        let method = self.get(name).ok_or_else(|| ObjectError::UndefinedMember {
            name: name.to_string(),
            class: self.class().name().to_string(),
        })?;

        let Value::Function(func) = method else {
            return Err(ObjectError::NotCallable {
                name: name.to_string(),
                found: method.type_name().to_string(),
            });
        };

        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(Value::Instance(self.clone()));
        call_args.extend_from_slice(args);
        func.call(&call_args)
    }

    fn instanceof_predicate(&self) -> Value {
        let instance = self.clone();
        Value::function(INSTANCEOF_PROPERTY, move |args| {
            // Accept both `instanceof(target)` and method-style `instanceof(self, target)`
            let target = match args {
                [Value::Instance(_), target] => target,
                [target, ..] => target,
                [] => return Ok(Value::Bool(false)),
            };
            let result = target.as_class().is_some_and(|t| instance.instanceof(t));
            Ok(Value::Bool(result))
        })
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Build a method body that receives the instance as `self`
pub fn method<F>(name: &str, body: F) -> Value
where
    F: Fn(&Instance, &[Value]) -> ObjectResult<Value> + Send + Sync + 'static,
{
    let method_name = name.to_string();
    Value::function(name, move |args| {
        let this = receiver(&method_name, args)?;
        body(this, &args[1..])
    })
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Instance {}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class().name())
            .field("fields", &self.field_names())
            .finish()
    }
}

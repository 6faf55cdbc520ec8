//! Class descriptors: identity, base link, instance members and static attributes

use crate::error::{ObjectError, ObjectResult};
use crate::factory::FactoryId;
use crate::instance::Instance;
use crate::member_table::MemberTable;
use crate::value::{MemberMap, Value};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Static attribute that overrides the constructor entry point
pub const CTOR: &str = "ctor";

/// Names resolved by the class itself; they cannot be static attributes
pub const CLASS_CAPABILITIES: [&str; 5] = ["name", "base", "members", "define", "extends"];

/// A class descriptor.
///
/// Cheap to clone: clones share the same class. Equality is identity.
#[derive(Clone)]
pub struct Class(Arc<ClassInner>);

struct ClassInner {
    name: Arc<str>,
    base: Option<Class>,
    /// Tag of the factory that created this class
    lineage: FactoryId,
    static_marker: Arc<str>,
    members: MemberTable,
    statics: RwLock<FxHashMap<String, Value>>,
}

impl Class {
    /// Create a class. Validation happens in the factory.
    pub(crate) fn new(
        name: &str,
        base: Option<Class>,
        lineage: FactoryId,
        static_marker: Arc<str>,
    ) -> Self {
        let members = MemberTable::with_parent(base.as_ref().map(|b| b.members().clone()));
        Class(Arc::new(ClassInner {
            name: Arc::from(name),
            base,
            lineage,
            static_marker,
            members,
            statics: RwLock::new(FxHashMap::default()),
        }))
    }

    /// Class name
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Base class, `None` for a root class
    #[inline]
    pub fn base(&self) -> Option<&Class> {
        self.0.base.as_ref()
    }

    /// Instance member table
    #[inline]
    pub fn members(&self) -> &MemberTable {
        &self.0.members
    }

    /// Tag of the factory this class was created by
    #[inline]
    pub fn lineage(&self) -> FactoryId {
        self.0.lineage
    }

    /// Apply one or more member groups.
    ///
    /// Each group must be a `Value::Map`. Keys starting with the factory's
    /// static marker become static attributes (marker stripped); all other
    /// keys become instance members. Groups and keys are applied in order,
    /// so the last assignment to a key wins. Assigning `Nil` removes the key.
    ///
    /// Fails on the first non-map group; earlier groups stay applied.
    pub fn define<I>(&self, groups: I) -> ObjectResult<()>
    where
        I: IntoIterator<Item = Value>,
    {
        for (index, group) in groups.into_iter().enumerate() {
            let Value::Map(entries) = group else {
                return Err(ObjectError::InvalidMemberGroup {
                    position: index + 1,
                    found: group.type_name().to_string(),
                });
            };

            for (key, value) in entries {
                match key.strip_prefix(&*self.0.static_marker) {
                    Some(name) => self.set_static(name, value)?,
                    None => self.set_member(key, value),
                }
            }
        }
        Ok(())
    }

    /// Apply a group of static attributes, no marker needed
    pub fn define_static(&self, entries: MemberMap) -> ObjectResult<()> {
        for (key, value) in entries {
            self.set_static(&key, value)?;
        }
        Ok(())
    }

    /// Apply a group of instance members, no marker interpretation
    pub fn define_instance(&self, entries: MemberMap) {
        for (key, value) in entries {
            self.set_member(key, value);
        }
    }

    fn set_member(&self, key: String, value: Value) {
        trace!(class = %self.name(), member = %key, "define member");
        if value.is_nil() {
            self.0.members.remove(&key);
        } else {
            self.0.members.set(key, value);
        }
    }

    /// Set a static attribute on this class only
    pub fn set_static(&self, name: &str, value: Value) -> ObjectResult<()> {
        if CLASS_CAPABILITIES.contains(&name) {
            return Err(ObjectError::ReservedName {
                name: name.to_string(),
                target: format!("class {}", self.name()),
            });
        }

        trace!(class = %self.name(), attribute = %name, "define static");
        let mut statics = self.0.statics.write();
        if value.is_nil() {
            statics.remove(name);
        } else {
            statics.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Static attribute defined on this exact class. Never inherited.
    pub fn get_static(&self, name: &str) -> Option<Value> {
        self.0.statics.read().get(name).cloned()
    }

    /// Property read on the class.
    ///
    /// `name` and `base` resolve to the class's identity, `extends` and
    /// `define` to functions bound to this class, and `ctor` to the
    /// constructor entry point. Anything else is a static attribute.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(Value::from(self.name())),
            "base" => Some(Value::from(self.base().cloned())),
            "extends" => {
                let class = self.clone();
                Some(Value::function("extends", move |args| {
                    let target = args.first().and_then(Value::as_class);
                    Ok(Value::Bool(target.is_some_and(|t| class.extends(t))))
                }))
            }
            "define" => {
                let class = self.clone();
                Some(Value::function("define", move |args| {
                    class.define(args.iter().cloned())?;
                    Ok(Value::Nil)
                }))
            }
            CTOR => Some(self.get_static(CTOR).unwrap_or_else(|| self.default_ctor())),
            "members" => None,
            _ => self.get_static(name),
        }
    }

    fn default_ctor(&self) -> Value {
        let class = self.clone();
        Value::function(CTOR, move |args| {
            let instance = receiver(CTOR, args)?;
            class.ctor(instance, &args[1..])?;
            Ok(Value::Nil)
        })
    }

    /// Check whether `target` is a strict ancestor of this class
    pub fn extends(&self, target: &Class) -> bool {
        let mut base = self.base();
        while let Some(class) = base {
            if class == target {
                return true;
            }
            base = class.base();
        }
        false
    }

    /// Check whether this class is `target` or extends it
    pub fn is_subclass_of(&self, target: &Class) -> bool {
        self == target || self.extends(target)
    }

    /// Constructor entry point.
    ///
    /// A `ctor` static holding a function is called as
    /// `ctor(instance, ...args)` and is responsible for calling its base's
    /// `ctor` itself. Without one, the call is forwarded unchanged to the
    /// base class, and a root class does nothing.
    pub fn ctor(&self, instance: &Instance, args: &[Value]) -> ObjectResult<()> {
        match self.get_static(CTOR) {
            Some(Value::Function(func)) => {
                trace!(class = %self.name(), "run constructor");
                let mut call_args = Vec::with_capacity(args.len() + 1);
                call_args.push(Value::Instance(instance.clone()));
                call_args.extend_from_slice(args);
                func.call(&call_args)?;
                Ok(())
            }
            Some(other) => Err(ObjectError::NotCallable {
                name: format!("{}.{}", self.name(), CTOR),
                found: other.type_name().to_string(),
            }),
            None => match self.base() {
                Some(base) => base.ctor(instance, args),
                None => Ok(()),
            },
        }
    }

    /// Create an instance bound to this class and run its constructor
    pub fn construct(&self, args: &[Value]) -> ObjectResult<Instance> {
        let instance = Instance::new(self.clone());
        self.ctor(&instance, args)?;
        Ok(instance)
    }

    /// Classes from this one up to its root
    pub fn ancestry(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.base())
    }
}

/// Extract the instance receiver from a bound function's arguments
pub(crate) fn receiver<'a>(name: &str, args: &'a [Value]) -> ObjectResult<&'a Instance> {
    match args.first() {
        Some(Value::Instance(instance)) => Ok(instance),
        other => Err(ObjectError::InvalidReceiver {
            name: name.to_string(),
            found: other.map_or("nothing", Value::type_name).to_string(),
        }),
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Class {}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name())
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name())
            .field("base", &self.base().map(|b| b.name().to_string()))
            .field("members", &self.members().keys())
            .finish()
    }
}

//! Dynamic values carried by member tables, static attributes and fields

use crate::class::Class;
use crate::error::{ObjectError, ObjectResult};
use crate::instance::Instance;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered string-keyed map, used for `define` groups
pub type MemberMap = IndexMap<String, Value, FxBuildHasher>;

/// Signature of a native function body
pub type NativeFn = dyn Fn(&[Value]) -> ObjectResult<Value> + Send + Sync;

/// A dynamically typed value
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Nil,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Immutable string
    Str(Arc<str>),
    /// String-keyed map
    Map(MemberMap),
    /// Callable native function
    Function(NativeFunction),
    /// Class descriptor
    Class(Class),
    /// Class instance
    Instance(Instance),
}

impl Value {
    /// Build a `Value::Map` from key/value pairs, keeping their order
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Wrap a closure as a `Value::Function`
    pub fn function<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> ObjectResult<Value> + Send + Sync + 'static,
    {
        Value::Function(NativeFunction::new(name, func))
    }

    /// Name of this value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// Check for `Nil`
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Get the boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer payload
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float payload
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the map payload
    pub fn as_map(&self) -> Option<&MemberMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get the function payload
    pub fn as_function(&self) -> Option<&NativeFunction> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Get the class payload
    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Value::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Get the instance payload
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Invoke this value.
    ///
    /// Functions are called with `args` as-is. Classes are constructors:
    /// calling one builds a new instance. Anything else is not callable.
    pub fn call(&self, args: &[Value]) -> ObjectResult<Value> {
        match self {
            Value::Function(func) => func.call(args),
            Value::Class(class) => class.construct(args).map(Value::Instance),
            other => Err(ObjectError::NotCallable {
                name: other.to_string(),
                found: other.type_name().to_string(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => write!(f, "<fn {}>", func.name()),
            Value::Class(class) => write!(f, "<class {}>", class.name()),
            Value::Instance(instance) => write!(f, "<{} instance>", instance.class().name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<MemberMap> for Value {
    fn from(map: MemberMap) -> Self {
        Value::Map(map)
    }
}

impl From<NativeFunction> for Value {
    fn from(func: NativeFunction) -> Self {
        Value::Function(func)
    }
}

impl From<Class> for Value {
    fn from(class: Class) -> Self {
        Value::Class(class)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Instance(instance)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Nil)
    }
}

/// A named native function.
///
/// Methods receive their receiver explicitly as the first argument, so a
/// member `describe(self)` is called as `describe.call(&[instance])`.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl NativeFunction {
    /// Create a new native function
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&[Value]) -> ObjectResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call the function
    pub fn call(&self, args: &[Value]) -> ObjectResult<Value> {
        (self.func)(args)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &NativeFunction) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}

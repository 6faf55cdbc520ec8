//! Class factory: validates names and bases and tags every class with its lineage

use crate::class::Class;
use crate::config::FactoryConfig;
use crate::error::{ObjectError, ObjectResult};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Global counter for generating unique factory IDs
static NEXT_FACTORY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide default factory
static DEFAULT_FACTORY: Lazy<ClassFactory> = Lazy::new(ClassFactory::new);

/// Identity tag shared by all classes of one factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryId(u64);

impl FactoryId {
    fn next() -> Self {
        FactoryId(NEXT_FACTORY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw ID value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Creates classes and enforces the same-lineage rule for bases.
///
/// A base class is accepted only if it was created by this factory; a class
/// from another factory is rejected even when it looks identical.
#[derive(Debug)]
pub struct ClassFactory {
    id: FactoryId,
    static_marker: Arc<str>,
    config: FactoryConfig,
}

impl ClassFactory {
    /// Create a factory with default configuration
    pub fn new() -> Self {
        let config = FactoryConfig::default();
        Self {
            id: FactoryId::next(),
            static_marker: Arc::from(config.static_marker.as_str()),
            config,
        }
    }

    /// Create a factory with custom configuration
    pub fn with_config(config: FactoryConfig) -> ObjectResult<Self> {
        config.validate()?;
        Ok(Self {
            id: FactoryId::next(),
            static_marker: Arc::from(config.static_marker.as_str()),
            config,
        })
    }

    /// The process-wide default factory
    pub fn global() -> &'static ClassFactory {
        &DEFAULT_FACTORY
    }

    /// Lineage tag carried by this factory's classes
    pub fn id(&self) -> FactoryId {
        self.id
    }

    /// Active configuration
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Check whether `class` was created by this factory
    pub fn owns(&self, class: &Class) -> bool {
        class.lineage() == self.id
    }

    /// Create a class named `name`, optionally inheriting from `base`
    pub fn create(&self, name: &str, base: Option<&Class>) -> ObjectResult<Class> {
        if name.is_empty() {
            return Err(ObjectError::InvalidName {
                found: "empty string".to_string(),
            });
        }

        if let Some(base) = base {
            if !self.owns(base) {
                debug!(class = %name, base = %base.name(), "rejected base from another factory");
                return Err(ObjectError::InvalidBase {
                    found: format!("class {}", base.name()),
                });
            }
        }

        debug!(class = %name, base = ?base.map(Class::name), "created class");
        Ok(Class::new(
            name,
            base.cloned(),
            self.id,
            self.static_marker.clone(),
        ))
    }

    /// Create a class from dynamic values.
    ///
    /// `name` must be a non-empty `Value::Str`; `base` is `Value::Nil` for a
    /// root class or a `Value::Class` created by this factory.
    pub fn create_value(&self, name: &Value, base: &Value) -> ObjectResult<Class> {
        let name = match name {
            Value::Str(s) => s,
            other => {
                return Err(ObjectError::InvalidName {
                    found: other.type_name().to_string(),
                })
            }
        };

        match base {
            Value::Nil => self.create(name, None),
            Value::Class(class) => self.create(name, Some(class)),
            other => Err(ObjectError::InvalidBase {
                found: other.type_name().to_string(),
            }),
        }
    }
}

impl Default for ClassFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a class with the process-wide default factory
pub fn create(name: &str, base: Option<&Class>) -> ObjectResult<Class> {
    ClassFactory::global().create(name, base)
}

/// Create a class from dynamic values with the process-wide default factory
pub fn create_value(name: &Value, base: &Value) -> ObjectResult<Class> {
    ClassFactory::global().create_value(name, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_root() {
        let factory = ClassFactory::new();
        let class = factory.create("Point", None).unwrap();

        assert_eq!(class.name(), "Point");
        assert!(class.base().is_none());
        assert!(factory.owns(&class));
    }

    #[test]
    fn test_empty_name_rejected() {
        let factory = ClassFactory::new();
        assert!(matches!(
            factory.create("", None),
            Err(ObjectError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_foreign_base_rejected() {
        let ours = ClassFactory::new();
        let theirs = ClassFactory::new();
        let foreign = theirs.create("Base", None).unwrap();

        assert_ne!(ours.id(), theirs.id());
        assert_eq!(
            ours.create("Derived", Some(&foreign)).unwrap_err(),
            ObjectError::InvalidBase {
                found: "class Base".to_string(),
            }
        );
    }

    #[test]
    fn test_create_value() {
        let factory = ClassFactory::new();
        let base = factory.create_value(&Value::from("Base"), &Value::Nil).unwrap();
        let derived = factory
            .create_value(&Value::from("Derived"), &Value::Class(base.clone()))
            .unwrap();

        assert_eq!(derived.base(), Some(&base));
        assert!(matches!(
            factory.create_value(&Value::Int(3), &Value::Nil),
            Err(ObjectError::InvalidName { .. })
        ));
        assert!(matches!(
            factory.create_value(&Value::from(""), &Value::Nil),
            Err(ObjectError::InvalidName { .. })
        ));
        assert_eq!(
            factory
                .create_value(&Value::from("X"), &Value::map([("name", "Fake")]))
                .unwrap_err(),
            ObjectError::InvalidBase {
                found: "map".to_string(),
            }
        );
    }

    #[test]
    fn test_custom_marker() {
        let config = FactoryConfig {
            static_marker: "$".to_string(),
        };
        let factory = ClassFactory::with_config(config).unwrap();
        let class = factory.create("Config", None).unwrap();
        class
            .define([Value::map([("$version", 2), ("__plain", 1)])])
            .unwrap();

        assert_eq!(class.get_static("version"), Some(Value::Int(2)));
        assert_eq!(class.members().get("__plain"), Some(Value::Int(1)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FactoryConfig {
            static_marker: String::new(),
        };
        assert!(ClassFactory::with_config(config).is_err());
    }

    #[test]
    fn test_global_factory_lineage() {
        let base = create("GlobalBase", None).unwrap();
        let derived = create("GlobalDerived", Some(&base)).unwrap();

        assert!(ClassFactory::global().owns(&derived));
        assert!(ClassFactory::new().create("Local", Some(&base)).is_err());
    }
}

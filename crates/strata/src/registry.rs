//! Class registry: binds declared classes under their names

use crate::class::Class;
use crate::error::{ObjectError, ObjectResult};
use crate::factory::ClassFactory;
use crate::value::Value;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::debug;

/// Explicit name → class scope for declaration-style class definitions.
///
/// `declare` is `create` + `define` + binding the result under its name.
/// Nothing is registered implicitly; callers own the registry.
#[derive(Debug)]
pub struct ClassRegistry<'f> {
    factory: &'f ClassFactory,
    classes: IndexMap<String, Class, FxBuildHasher>,
}

impl ClassRegistry<'static> {
    /// Create an empty registry backed by the process-wide factory
    pub fn new() -> Self {
        Self::with_factory(ClassFactory::global())
    }
}

impl<'f> ClassRegistry<'f> {
    /// Create an empty registry backed by `factory`
    pub fn with_factory(factory: &'f ClassFactory) -> Self {
        Self {
            factory,
            classes: IndexMap::default(),
        }
    }

    /// Factory used by `declare`
    pub fn factory(&self) -> &'f ClassFactory {
        self.factory
    }

    /// Create a class, apply `groups` to it and bind it under `name`.
    ///
    /// `base`, if given, names a class already in this registry. Declaring
    /// an existing name rebinds it; classes built on the old binding keep
    /// their base.
    pub fn declare<I>(&mut self, name: &str, base: Option<&str>, groups: I) -> ObjectResult<Class>
    where
        I: IntoIterator<Item = Value>,
    {
        let base = match base {
            Some(base_name) => Some(self.require(base_name)?.clone()),
            None => None,
        };

        let class = self.factory.create(name, base.as_ref())?;
        class.define(groups)?;

        debug!(class = %name, rebound = self.contains(name), "declared class");
        self.classes.insert(name.to_string(), class.clone());
        Ok(class)
    }

    /// Bind an existing class under its own name, returning any class it replaced
    pub fn register(&mut self, class: Class) -> Option<Class> {
        self.classes.insert(class.name().to_string(), class)
    }

    /// Get class by name
    pub fn get(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    /// Get class by name, failing with `UnknownClass`
    pub fn require(&self, name: &str) -> ObjectResult<&Class> {
        self.get(name).ok_or_else(|| ObjectError::UnknownClass {
            name: name.to_string(),
        })
    }

    /// Check whether `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of bound classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over bindings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Class)> {
        self.classes.iter().map(|(name, class)| (name.as_str(), class))
    }
}

impl Default for ClassRegistry<'static> {
    fn default() -> Self {
        Self::new()
    }
}

//! Factory configuration, optionally loaded from the `[classes]` table of a TOML file.

use crate::error::{ObjectError, ObjectResult};
use serde::Deserialize;

/// Default prefix that routes a `define` key to the class's static attributes
pub const DEFAULT_STATIC_MARKER: &str = "__";

/// Configuration for a [`ClassFactory`](crate::ClassFactory)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactoryConfig {
    /// Key prefix marking a static attribute in `define` groups (default: `"__"`)
    pub static_marker: String,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            static_marker: DEFAULT_STATIC_MARKER.to_string(),
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigDocument {
    #[serde(default)]
    classes: FactoryConfig,
}

impl FactoryConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the `[classes]` table from a TOML document.
    ///
    /// A missing table yields the defaults; other tables are ignored.
    pub fn from_toml_str(source: &str) -> ObjectResult<Self> {
        let document: ConfigDocument =
            toml::from_str(source).map_err(|e| ObjectError::InvalidConfig(e.to_string()))?;
        document.classes.validate()?;
        Ok(document.classes)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> ObjectResult<()> {
        if self.static_marker.is_empty() {
            return Err(ObjectError::InvalidConfig(
                "static_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

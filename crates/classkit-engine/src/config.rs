//! Engine configuration (`classkit.toml`)
//!
//! ```toml
//! constructor_name = "new"
//! internal_prefix = "__"
//! protect_methods = true
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading engine options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed but semantically invalid
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Engine-wide behaviour switches
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Method name used by the generated constructor (default: "new")
    pub constructor_name: String,

    /// Method names starting with this prefix are bookkeeping entries and
    /// are hidden from method listings (default: "__")
    pub internal_prefix: String,

    /// Refuse to let generated accessors and generators replace
    /// hand-written methods of the same name (default: true)
    pub protect_methods: bool,
}

fn default_constructor_name() -> String {
    "new".to_string()
}

fn default_internal_prefix() -> String {
    "__".to_string()
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            constructor_name: default_constructor_name(),
            internal_prefix: default_internal_prefix(),
            protect_methods: true,
        }
    }
}

impl EngineOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: EngineOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_method_name(&self.constructor_name) {
            return Err(ConfigError::Invalid(format!(
                "constructor_name {:?} is not a valid method name",
                self.constructor_name
            )));
        }
        if self.internal_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "internal_prefix must not be empty".to_string(),
            ));
        }
        if self.constructor_name.starts_with(&self.internal_prefix) {
            return Err(ConfigError::Invalid(format!(
                "constructor_name {:?} would be hidden by internal_prefix {:?}",
                self.constructor_name, self.internal_prefix
            )));
        }
        Ok(())
    }
}

/// Identifier rule shared by method names and class-name segments
pub(crate) fn is_method_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

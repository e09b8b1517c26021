//! The engine service
//!
//! [`Engine`] owns the class registry and the engine options. It is created
//! once and passed by reference to every operation and to every method body,
//! so a body may itself define classes, install methods or dispatch further.
//!
//! Operations are grouped by concern:
//! - `methods`: add / override / list / invoke / inherited dispatch
//! - `inheritance`: extend, ancestors, descendants, super dispatch
//! - `hooks`: advice installation
//! - `accessors`: accessor generators and generated accessors
//! - `constructor`: generated constructors
//! - `import`: copying methods between classes
//! - `namespace`: namespace loading and pragma collaborators
//!
//! Locks are never held while a method body runs: the callable is cloned out
//! of its class definition first.

mod accessors;
mod constructor;
mod hooks;
mod import;
mod inheritance;
mod methods;
mod namespace;

pub use import::{ImportOutcome, ImportReport};
pub use methods::BoundMethod;

use parking_lot::{Mutex, RwLock};

use crate::class_registry::{ClassRef, ClassRegistry, ResolveMode};
use crate::config::{ConfigError, EngineOptions};
use crate::error::{ImportError, MetaResult};
use crate::handle::ClassHandle;

/// Runtime object-protocol engine
#[derive(Debug)]
pub struct Engine {
    /// Class registry
    classes: RwLock<ClassRegistry>,
    /// Behaviour switches
    options: EngineOptions,
    /// Failures collected by the most recent method import
    last_errors: Mutex<Vec<ImportError>>,
}

impl Engine {
    /// Create an engine with default options
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(ClassRegistry::new()),
            options: EngineOptions::default(),
            last_errors: Mutex::new(Vec::new()),
        }
    }

    /// Create an engine with explicit options, rejecting invalid ones
    pub fn with_options(options: EngineOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            options,
            ..Self::new()
        })
    }

    /// Engine options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Resolve a class definition by name
    pub fn resolve(&self, name: &str, mode: ResolveMode) -> MetaResult<ClassRef> {
        if let Some(class) = self.classes.read().get_class_by_name(name) {
            return Ok(class);
        }
        self.classes.write().resolve(name, mode)
    }

    /// Resolve an existing class
    pub(crate) fn class(&self, name: &str) -> MetaResult<ClassRef> {
        self.resolve(name, ResolveMode::Existing)
    }

    /// Check if a class is registered
    pub fn exists(&self, name: &str) -> bool {
        self.classes.read().exists(name)
    }

    /// Names of all registered classes in registration order
    pub fn class_names(&self) -> Vec<String> {
        self.classes.read().class_names()
    }

    /// Snapshot of all class definitions in registration order
    pub(crate) fn all_classes(&self) -> Vec<ClassRef> {
        self.classes.read().iter().cloned().collect()
    }

    /// Handle to a class, creating it if absent
    pub fn define(&self, name: &str) -> MetaResult<ClassHandle<'_>> {
        ClassHandle::new(self, name)
    }

    /// Handle to an existing class
    pub fn handle(&self, name: &str) -> MetaResult<ClassHandle<'_>> {
        ClassHandle::init(self, name)
    }

    /// Failures recorded by the most recent `import_methods`
    pub fn last_errors(&self) -> Vec<ImportError> {
        self.last_errors.lock().clone()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetaError;
    use std::sync::Arc;

    #[test]
    fn test_resolve_is_idempotent() {
        let engine = Engine::new();
        let a = engine.resolve("Point", ResolveMode::Create).unwrap();
        let b = engine.resolve("Point", ResolveMode::Create).unwrap();
        let c = engine.resolve("Point", ResolveMode::Existing).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(engine.class_names(), vec!["Point"]);
    }

    #[test]
    fn test_resolve_existing_missing() {
        let engine = Engine::new();
        assert_eq!(
            engine.resolve("Nope", ResolveMode::Existing).unwrap_err(),
            MetaError::ClassNotFound("Nope".to_string())
        );
        assert!(!engine.exists("Nope"));
    }

    #[test]
    fn test_custom_options() {
        let options = EngineOptions {
            constructor_name: "create".to_string(),
            ..EngineOptions::default()
        };
        let engine = Engine::with_options(options).unwrap();
        assert_eq!(engine.options().constructor_name, "create");
    }

    #[test]
    fn test_invalid_options_rejected() {
        let empty_prefix = EngineOptions {
            internal_prefix: String::new(),
            ..EngineOptions::default()
        };
        assert!(matches!(
            Engine::with_options(empty_prefix),
            Err(ConfigError::Invalid(_))
        ));

        let bad_constructor = EngineOptions {
            constructor_name: "make new".to_string(),
            ..EngineOptions::default()
        };
        assert!(matches!(
            Engine::with_options(bad_constructor),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_handle_of_malformed_name_is_not_found() {
        let engine = Engine::new();
        for name in ["", "not valid"] {
            assert_eq!(
                engine.handle(name).unwrap_err(),
                MetaError::ClassNotFound(name.to_string())
            );
        }
    }
}

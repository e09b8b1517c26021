//! Class registry for managing live class definitions

use crate::config::is_method_name;
use crate::error::{MetaError, MetaResult};
use crate::method_table::MethodTable;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Shared handle to a class definition
pub type ClassRef = Arc<RwLock<ClassDefinition>>;

/// Whether `resolve` may create missing classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Fail with `ClassNotFound` if absent
    Existing,
    /// Register an empty definition if absent
    Create,
}

/// A live class: method table, parents and accessor names
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// Class ID (registration index)
    pub id: usize,
    /// Class name
    pub name: String,
    /// Methods declared on this class
    pub methods: MethodTable,
    /// Direct parents in declaration order
    pub parents: Vec<String>,
    /// Attributes with generated accessors, in installation order
    pub accessors: Vec<String>,
}

impl ClassDefinition {
    /// Create an empty definition
    pub fn new(id: usize, name: String) -> Self {
        Self {
            id,
            name,
            methods: MethodTable::new(),
            parents: Vec::new(),
            accessors: Vec::new(),
        }
    }

    /// Record an accessor name (once)
    pub fn record_accessor(&mut self, attribute: &str) {
        if !self.accessors.iter().any(|a| a == attribute) {
            self.accessors.push(attribute.to_string());
        }
    }
}

/// Class registry for the engine
#[derive(Debug, Default)]
pub struct ClassRegistry {
    /// Classes indexed by ID
    classes: Vec<ClassRef>,
    /// Class name to ID mapping
    name_to_id: FxHashMap<String, usize>,
}

impl ClassRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a class by name, creating it in `ResolveMode::Create`
    pub fn resolve(&mut self, name: &str, mode: ResolveMode) -> MetaResult<ClassRef> {
        if let Some(class) = self.get_class_by_name(name) {
            return Ok(class);
        }
        match mode {
            ResolveMode::Existing => Err(MetaError::ClassNotFound(name.to_string())),
            ResolveMode::Create => {
                validate_class_name(name)?;
                Ok(self.register_class(name))
            }
        }
    }

    /// Register a new empty class and return it
    fn register_class(&mut self, name: &str) -> ClassRef {
        let id = self.classes.len();
        let class = Arc::new(RwLock::new(ClassDefinition::new(id, name.to_string())));
        self.classes.push(class.clone());
        self.name_to_id.insert(name.to_string(), id);
        log::debug!("[ClassRegistry::resolve] created class {} (id {})", name, id);
        class
    }

    /// Get class by name
    pub fn get_class_by_name(&self, name: &str) -> Option<ClassRef> {
        self.name_to_id
            .get(name)
            .and_then(|id| self.classes.get(*id))
            .cloned()
    }

    /// Get class by ID
    pub fn get_class(&self, id: usize) -> Option<ClassRef> {
        self.classes.get(id).cloned()
    }

    /// Check if a class is registered
    pub fn exists(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// Class names in registration order
    pub fn class_names(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.read().name.clone()).collect()
    }

    /// Iterate over all classes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ClassRef> {
        self.classes.iter()
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if no class is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Check a class identifier: `::`-separated identifier segments
pub fn validate_class_name(name: &str) -> MetaResult<()> {
    if !name.is_empty() && name.split("::").all(is_method_name) {
        Ok(())
    } else {
        Err(MetaError::InvalidClassName(name.to_string()))
    }
}

//! Object model: instances tagged with a class name

use crate::value::{Comparison, Value};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Object state: class tag plus attribute store
#[derive(Debug, Clone)]
pub struct Object {
    /// Unique object ID (assigned on creation)
    pub object_id: u64,
    /// Name of the class this object belongs to
    pub class_name: String,
    /// Attribute values by name
    attributes: FxHashMap<String, Value>,
}

impl Object {
    /// Create a new object with an empty attribute store
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            object_id: generate_object_id(),
            class_name: class_name.into(),
            attributes: FxHashMap::default(),
        }
    }

    /// Get an attribute value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.attributes.insert(name.into(), value)
    }

    /// Remove an attribute
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    /// Check if an attribute is set
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate over attributes (unordered)
    pub fn attributes(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }

    /// Number of attributes set
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// Shared handle to a live object
///
/// Cloning the handle aliases the object; use [`Instance::deep_clone`] for an
/// independent copy.
#[derive(Clone)]
pub struct Instance(Arc<RwLock<Object>>);

impl Instance {
    /// Allocate a fresh, empty instance of `class_name`
    pub fn new(class_name: impl Into<String>) -> Self {
        Self::from_object(Object::new(class_name))
    }

    /// Wrap existing object state
    pub fn from_object(object: Object) -> Self {
        Instance(Arc::new(RwLock::new(object)))
    }

    /// Class tag
    pub fn class_name(&self) -> String {
        self.0.read().class_name.clone()
    }

    /// Unique object ID
    pub fn object_id(&self) -> u64 {
        self.0.read().object_id
    }

    /// Get an attribute value (aliasing clone)
    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.read().get(name).cloned()
    }

    /// Set an attribute, returning the previous value
    pub fn set(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.write().set(name, value)
    }

    /// Remove an attribute
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.0.write().remove(name)
    }

    /// Check if an attribute is set
    pub fn has(&self, name: &str) -> bool {
        self.0.read().has(name)
    }

    /// Attribute names, sorted
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.read().attributes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Shallow snapshot of all attributes
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .attributes()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Independent deep copy (see [`crate::clone`])
    pub fn deep_clone(&self) -> Instance {
        crate::clone::clone_instance(self)
    }

    /// Check whether two handles point at the same object
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Same class tag and equal attributes
    ///
    /// Cycles are followed once: an object pair met again while it is
    /// still being compared counts as equal.
    pub fn structurally_eq(&self, other: &Instance) -> bool {
        Comparison::default().instances(self, other)
    }

    /// Identity key (stable for the lifetime of the object)
    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Read access to the object state
    pub fn read(&self) -> RwLockReadGuard<'_, Object> {
        self.0.read()
    }

    /// Write access to the object state
    pub fn write(&self) -> RwLockWriteGuard<'_, Object> {
        self.0.write()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (class_name, object_id) = {
            let obj = self.0.read();
            (obj.class_name.clone(), obj.object_id)
        };
        write!(f, "{}#{}", class_name, object_id)
    }
}

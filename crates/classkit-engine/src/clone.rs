//! Deep copies of live values
//!
//! Lists, maps and instances are copied node by node. Each source node is
//! copied at most once, so sharing and cycles in the source graph show up
//! the same way in the copy. Class and code references are leaves.

use crate::object::Instance;
use crate::value::{ListRef, MapRef, Value};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Deep copy of any value
pub fn deep_clone(value: &Value) -> Value {
    Cloner::default().value(value)
}

/// Deep copy of an instance; the copy keeps the class tag and gets a new id
pub fn clone_instance(instance: &Instance) -> Instance {
    Cloner::default().instance(instance)
}

/// Seen tables keyed on source node identity
#[derive(Default)]
struct Cloner {
    objects: FxHashMap<usize, Instance>,
    lists: FxHashMap<usize, ListRef>,
    maps: FxHashMap<usize, MapRef>,
}

impl Cloner {
    fn value(&mut self, value: &Value) -> Value {
        match value {
            Value::List(list) => Value::List(self.list(list)),
            Value::Map(map) => Value::Map(self.map(map)),
            Value::Object(instance) => Value::Object(self.instance(instance)),
            leaf => leaf.clone(),
        }
    }

    fn instance(&mut self, source: &Instance) -> Instance {
        if let Some(copy) = self.objects.get(&source.identity()) {
            return copy.clone();
        }
        let copy = Instance::new(source.class_name());
        self.objects.insert(source.identity(), copy.clone());

        // Snapshot first: the source lock must not be held while recursing
        for (name, value) in source.snapshot() {
            let value = self.value(&value);
            copy.set(name, value);
        }
        copy
    }

    fn list(&mut self, source: &ListRef) -> ListRef {
        let key = Arc::as_ptr(source) as usize;
        if let Some(copy) = self.lists.get(&key) {
            return copy.clone();
        }
        let copy: ListRef = Arc::new(RwLock::new(Vec::new()));
        self.lists.insert(key, copy.clone());

        let items = source.read().clone();
        let copied: Vec<Value> = items.iter().map(|item| self.value(item)).collect();
        *copy.write() = copied;
        copy
    }

    fn map(&mut self, source: &MapRef) -> MapRef {
        let key = Arc::as_ptr(source) as usize;
        if let Some(copy) = self.maps.get(&key) {
            return copy.clone();
        }
        let copy: MapRef = Arc::new(RwLock::new(FxHashMap::default()));
        self.maps.insert(key, copy.clone());

        let entries = source.read().clone();
        let copied: FxHashMap<String, Value> = entries
            .iter()
            .map(|(k, v)| (k.clone(), self.value(v)))
            .collect();
        *copy.write() = copied;
        copy
    }
}

//! Dynamic values
//!
//! Scalars are stored inline. Lists, maps and instances are shared
//! references: cloning a `Value` aliases them, [`deep_clone`](crate::deep_clone)
//! copies them.

use crate::function::MethodFn;
use crate::object::Instance;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// Shared, mutable list
pub type ListRef = Arc<RwLock<Vec<Value>>>;

/// Shared, mutable string-keyed map
pub type MapRef = Arc<RwLock<FxHashMap<String, Value>>>;

/// A value flowing through method calls and attribute stores
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Owned string
    Str(String),
    /// Shared list
    List(ListRef),
    /// Shared map
    Map(MapRef),
    /// Object instance
    Object(Instance),
    /// Reference to a class by name (receiver of class methods)
    Class(String),
    /// Code reference
    Code(MethodFn),
}

impl Value {
    /// Build a list value
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Arc::new(RwLock::new(items.into_iter().collect())))
    }

    /// Build a map value
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Arc::new(RwLock::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Reference to a class
    pub fn class(name: impl Into<String>) -> Self {
        Value::Class(name.into())
    }

    /// Check for null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the list reference
    pub fn as_list(&self) -> Option<&ListRef> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Get the map reference
    pub fn as_map(&self) -> Option<&MapRef> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the instance
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the referenced class name
    pub fn as_class_name(&self) -> Option<&str> {
        match self {
            Value::Class(name) => Some(name),
            _ => None,
        }
    }

    /// Get the code reference
    pub fn as_code(&self) -> Option<&MethodFn> {
        match self {
            Value::Code(f) => Some(f),
            _ => None,
        }
    }

    /// Snapshot of a list's items (shallow)
    pub fn list_items(&self) -> Option<Vec<Value>> {
        self.as_list().map(|l| l.read().clone())
    }

    /// Look up a key in a map value
    pub fn map_get(&self, key: &str) -> Option<Value> {
        self.as_map().and_then(|m| m.read().get(key).cloned())
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Class(_) => "class",
            Value::Code(_) => "code",
        }
    }
}

impl PartialEq for Value {
    /// Structural equality; integers and floats never compare equal
    fn eq(&self, other: &Self) -> bool {
        Comparison::default().values(self, other)
    }
}

/// Structural comparison that tolerates cyclic graphs
///
/// A pair of containers already under comparison is taken as equal; the
/// comparison that entered it first decides the result.
#[derive(Default)]
pub(crate) struct Comparison {
    active: FxHashSet<(usize, usize)>,
}

impl Comparison {
    pub(crate) fn values(&mut self, left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Code(a), Value::Code(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => self.lists(a, b),
            (Value::Map(a), Value::Map(b)) => self.maps(a, b),
            (Value::Object(a), Value::Object(b)) => self.instances(a, b),
            _ => false,
        }
    }

    fn enter(&mut self, key: (usize, usize)) -> bool {
        self.active.insert(key)
    }

    fn lists(&mut self, a: &ListRef, b: &ListRef) -> bool {
        if Arc::ptr_eq(a, b) {
            return true;
        }
        let key = (Arc::as_ptr(a) as usize, Arc::as_ptr(b) as usize);
        if !self.enter(key) {
            return true;
        }
        // Snapshot before comparing so no lock is held during recursion
        let left = a.read().clone();
        let right = b.read().clone();
        let equal = left.len() == right.len()
            && left.iter().zip(&right).all(|(l, r)| self.values(l, r));
        self.active.remove(&key);
        equal
    }

    fn maps(&mut self, a: &MapRef, b: &MapRef) -> bool {
        if Arc::ptr_eq(a, b) {
            return true;
        }
        let key = (Arc::as_ptr(a) as usize, Arc::as_ptr(b) as usize);
        if !self.enter(key) {
            return true;
        }
        let left = a.read().clone();
        let right = b.read().clone();
        let equal = self.entries(&left, &right);
        self.active.remove(&key);
        equal
    }

    pub(crate) fn instances(&mut self, a: &Instance, b: &Instance) -> bool {
        if a.ptr_eq(b) {
            return true;
        }
        if a.class_name() != b.class_name() {
            return false;
        }
        let key = (a.identity(), b.identity());
        if !self.enter(key) {
            return true;
        }
        let left: FxHashMap<String, Value> = a.snapshot().into_iter().collect();
        let right: FxHashMap<String, Value> = b.snapshot().into_iter().collect();
        let equal = self.entries(&left, &right);
        self.active.remove(&key);
        equal
    }

    fn entries(&mut self, left: &FxHashMap<String, Value>, right: &FxHashMap<String, Value>) -> bool {
        left.len() == right.len()
            && left
                .iter()
                .all(|(k, l)| right.get(k).is_some_and(|r| self.values(l, r)))
    }
}

thread_local! {
    /// Containers currently being formatted on this thread
    static FORMATTING: RefCell<FxHashSet<usize>> = RefCell::new(FxHashSet::default());
}

fn enter_formatting(key: usize) -> bool {
    FORMATTING.with(|set| set.borrow_mut().insert(key))
}

fn leave_formatting(key: usize) {
    FORMATTING.with(|set| {
        set.borrow_mut().remove(&key);
    });
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(l) => {
                let key = Arc::as_ptr(l) as usize;
                if !enter_formatting(key) {
                    return write!(f, "[...]");
                }
                let items = l.read().clone();
                let result = f.debug_list().entries(items.iter()).finish();
                leave_formatting(key);
                result
            }
            Value::Map(m) => {
                let key = Arc::as_ptr(m) as usize;
                if !enter_formatting(key) {
                    return write!(f, "{{...}}");
                }
                let mut entries: Vec<(String, Value)> =
                    m.read().iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                let result = f.debug_map().entries(entries.iter().map(|(k, v)| (k, v))).finish();
                leave_formatting(key);
                result
            }
            Value::Object(o) => write!(f, "{:?}", o),
            Value::Class(name) => write!(f, "class {}", name),
            Value::Code(code) => write!(f, "{:?}", code),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

impl From<MethodFn> for Value {
    fn from(code: MethodFn) -> Self {
        Value::Code(code)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_equality() {
        assert_eq!(Value::from(3), Value::Int(3));
        assert_ne!(Value::Int(2), Value::Float(2.0));
        assert_eq!(Value::Float(2.0), Value::Float(2.0));
        assert_ne!(Value::from("a"), Value::from("b"));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_clone_aliases_containers() {
        let list = Value::list(vec![Value::from(1)]);
        let alias = list.clone();
        alias.as_list().unwrap().write().push(Value::from(2));

        assert_eq!(list.list_items().unwrap().len(), 2);
    }

    #[test]
    fn test_structural_equality_of_distinct_containers() {
        let a = Value::map([("k", Value::list(vec![Value::from(1), Value::from(2)]))]);
        let b = Value::map([("k", Value::list(vec![Value::from(1), Value::from(2)]))]);
        assert_eq!(a, b);

        b.as_map().unwrap().write().insert("extra".to_string(), Value::Null);
        assert_ne!(a, b);
    }

    #[test]
    fn test_accessors() {
        let v = Value::map([("name", Value::from("ada"))]);
        assert_eq!(v.map_get("name").unwrap().as_str(), Some("ada"));
        assert!(v.map_get("missing").is_none());
        assert_eq!(Value::class("Point").as_class_name(), Some("Point"));
        assert_eq!(Value::Int(1).as_float(), Some(1.0));
        assert_eq!(Value::Null.type_name(), "null");
    }

    #[test]
    fn test_self_containing_list() {
        let list = Value::list(vec![Value::from(1)]);
        list.as_list().unwrap().write().push(list.clone());
        let twin = Value::list(vec![Value::from(1)]);
        twin.as_list().unwrap().write().push(twin.clone());

        assert_eq!(list, twin);
        assert_eq!(format!("{:?}", list), "[1, [...]]");

        twin.as_list().unwrap().write()[0] = Value::from(2);
        assert_ne!(list, twin);

        // Break the cycles so the lists are freed
        list.as_list().unwrap().write().clear();
        twin.as_list().unwrap().write().clear();
    }

    #[test]
    fn test_debug_is_sorted_for_maps() {
        let v = Value::map([("b", Value::from(2)), ("a", Value::from(1))]);
        assert_eq!(format!("{:?}", v), "{\"a\": 1, \"b\": 2}");
    }
}

//! Per-class method tables
//!
//! A table maps names to entries in declaration order. Overriding replaces
//! an entry in place so a method keeps its original position.

use rustc_hash::FxHashMap;

use crate::config::is_method_name;
use crate::error::{MetaError, MetaResult};
use crate::function::MethodFn;
use crate::hooks::{Advice, HookChain};

/// Check a method or attribute name: an ASCII identifier
pub fn validate_method_name(name: &str) -> MetaResult<()> {
    if is_method_name(name) {
        Ok(())
    } else {
        Err(MetaError::InvalidMethodName(name.to_string()))
    }
}

/// How a method entry came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Installed by `add` or `override`
    Plain,
    /// Generated attribute accessor
    Accessor,
    /// Accessor generator (`has`-style)
    Generator,
    /// Generated constructor
    Constructor,
    /// Copied from another class
    Imported,
}

impl MethodKind {
    /// Whether the engine generated this entry
    pub fn is_generated(self) -> bool {
        !matches!(self, MethodKind::Plain | MethodKind::Imported)
    }
}

/// A named method with its optional advice
#[derive(Debug, Clone)]
pub struct MethodEntry {
    name: String,
    kind: MethodKind,
    /// Body as installed, before any advice
    body: MethodFn,
    /// Present once at least one advice was added
    hooks: Option<HookChain>,
    /// Body composed with the hook chain
    effective: MethodFn,
}

impl MethodEntry {
    /// Create an entry without advice
    pub fn new(name: impl Into<String>, kind: MethodKind, body: MethodFn) -> Self {
        Self {
            name: name.into(),
            kind,
            effective: body.clone(),
            body,
            hooks: None,
        }
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry kind
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Body as installed
    pub fn body(&self) -> &MethodFn {
        &self.body
    }

    /// Callable to run on invocation (hook-composed when advised)
    pub fn callable(&self) -> &MethodFn {
        &self.effective
    }

    /// Advice chain, if any
    pub fn hooks(&self) -> Option<&HookChain> {
        self.hooks.as_ref()
    }

    /// Append advice and recompose the effective callable
    pub fn add_advice(&mut self, advice: Advice) {
        let chain = self.hooks.get_or_insert_with(HookChain::default);
        chain.push(advice);
        self.effective = chain.compose(&self.body);
    }
}

/// Method table for a single class
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    /// Method name to entry index mapping
    indices: FxHashMap<String, usize>,
    /// Entries in declaration order
    entries: Vec<MethodEntry>,
}

impl MethodTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry unless the name is taken; returns false if it was
    pub fn insert_new(&mut self, entry: MethodEntry) -> bool {
        if self.indices.contains_key(entry.name()) {
            return false;
        }
        self.indices.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Insert or replace an entry, returning the replaced one
    pub fn replace(&mut self, entry: MethodEntry) -> Option<MethodEntry> {
        match self.indices.get(entry.name()) {
            Some(&index) => Some(std::mem::replace(&mut self.entries[index], entry)),
            None => {
                self.insert_new(entry);
                None
            }
        }
    }

    /// Get an entry by name
    pub fn get(&self, name: &str) -> Option<&MethodEntry> {
        self.indices.get(name).map(|&i| &self.entries[i])
    }

    /// Get a mutable entry by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut MethodEntry> {
        match self.indices.get(name) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    /// Check if a method exists
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Method names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Iterate over entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &MethodEntry> {
        self.entries.iter()
    }

    /// Number of methods
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Inheritance graph: extend, ancestors, descendants, super dispatch
//!
//! Ancestors are linearized depth-first, left to right, keeping the first
//! occurrence of each class. For the diamond `A(B, C)`, `B(D)`, `C(D)` the
//! linearization of `A` is `B, D, C`. This is not C3: a shared ancestor is
//! visited through the first path that reaches it.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use crate::engine::Engine;
use crate::error::{MetaError, MetaResult};
use crate::value::Value;

impl Engine {
    /// Append parents to `class`, skipping ones already present
    pub fn extend(&self, class: &str, parents: &[&str]) -> MetaResult<()> {
        let class_ref = self.class(class)?;

        // Validate everything before touching the parent list
        let mut added: Vec<String> = Vec::new();
        {
            let current = class_ref.read().parents.clone();
            for &parent in parents {
                if parent == class {
                    return Err(MetaError::CyclicInheritance {
                        class: class.to_string(),
                        parent: parent.to_string(),
                    });
                }
                self.class(parent)?;
                if self.ancestors(parent)?.iter().any(|a| a == class) {
                    return Err(MetaError::CyclicInheritance {
                        class: class.to_string(),
                        parent: parent.to_string(),
                    });
                }
                if !current.iter().any(|p| p == parent) && !added.iter().any(|p| p == parent) {
                    added.push(parent.to_string());
                }
            }
        }

        if !added.is_empty() {
            log::debug!("[Engine::extend] {} += {:?}", class, added);
            class_ref.write().parents.extend(added);
        }
        Ok(())
    }

    /// Direct parents in declaration order
    pub fn superclasses(&self, class: &str) -> MetaResult<Vec<String>> {
        let class_ref = self.class(class)?;
        let parents = class_ref.read().parents.clone();
        Ok(parents)
    }

    /// Registered classes that list `class` as a direct parent
    pub fn subclasses(&self, class: &str) -> MetaResult<Vec<String>> {
        self.class(class)?;
        let mut children = Vec::new();
        for candidate in self.all_classes() {
            let def = candidate.read();
            if def.parents.iter().any(|p| p == class) {
                children.push(def.name.clone());
            }
        }
        Ok(children)
    }

    /// Linearized ancestors of `class`, excluding `class`
    pub fn ancestors(&self, class: &str) -> MetaResult<Vec<String>> {
        self.class(class)?;
        let mut seen = FxHashSet::default();
        seen.insert(class.to_string());
        let mut order = Vec::new();
        self.collect_ancestors(class, &mut seen, &mut order);
        Ok(order)
    }

    fn collect_ancestors(&self, class: &str, seen: &mut FxHashSet<String>, order: &mut Vec<String>) {
        let parents = match self.class(class) {
            Ok(class_ref) => class_ref.read().parents.clone(),
            Err(_) => return,
        };
        for parent in parents {
            if seen.insert(parent.clone()) {
                order.push(parent.clone());
                self.collect_ancestors(&parent, seen, order);
            }
        }
    }

    /// Transitive subclasses of `class`, nearest first
    pub fn descendants(&self, class: &str) -> MetaResult<Vec<String>> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([class.to_string()]);
        while let Some(current) = queue.pop_front() {
            for child in self.subclasses(&current)? {
                if seen.insert(child.clone()) {
                    order.push(child.clone());
                    queue.push_back(child);
                }
            }
        }
        Ok(order)
    }

    /// Whether `class` is `other` or inherits from it
    pub fn isa(&self, class: &str, other: &str) -> bool {
        if class == other {
            return self.exists(class);
        }
        match self.ancestors(class) {
            Ok(ancestors) => ancestors.iter().any(|a| a == other),
            Err(_) => false,
        }
    }

    /// Invoke the nearest ancestor's `method` with the original receiver
    pub fn call_super(
        &self,
        class: &str,
        method: &str,
        receiver: &Value,
        args: &[Value],
    ) -> MetaResult<Value> {
        for ancestor in self.ancestors(class)? {
            if let Some(body) = self.local_method(&ancestor, method) {
                log::trace!("[Engine::call_super] {}::{} -> {}", class, method, ancestor);
                return body.call(self, receiver, args);
            }
        }
        Err(MetaError::NoSuperMethod {
            class: class.to_string(),
            method: method.to_string(),
        })
    }
}

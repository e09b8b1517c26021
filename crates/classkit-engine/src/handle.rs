//! Chainable class handles
//!
//! A [`ClassHandle`] binds an engine reference to one class name. Mutating
//! operations consume the handle and hand it back, so definitions read as a
//! chain:
//!
//! ```ignore
//! let point = engine
//!     .define("Point")?
//!     .install_constructor()?
//!     .has("x", AccessorOptions::rw().with_default(0))?
//!     .has("y", AccessorOptions::rw().with_default(0))?;
//! ```
//!
//! Queries borrow the handle and return data.

use crate::accessor::AccessorOptions;
use crate::class_registry::ResolveMode;
use crate::engine::Engine;
use crate::error::{ImportError, MetaResult};
use crate::function::MethodFn;
use crate::hooks::{Advice, AroundFn, HookKind};
use crate::namespace::{NamespaceLoader, PragmaEnabler};
use crate::object::Instance;
use crate::value::Value;

/// Operation context bound to one class
#[derive(Debug, Clone)]
pub struct ClassHandle<'e> {
    engine: &'e Engine,
    class: String,
}

impl<'e> ClassHandle<'e> {
    /// Bind to `name`, creating the class if absent
    pub fn new(engine: &'e Engine, name: &str) -> MetaResult<Self> {
        engine.resolve(name, ResolveMode::Create)?;
        Ok(Self {
            engine,
            class: name.to_string(),
        })
    }

    /// Bind to an existing class
    pub fn init(engine: &'e Engine, name: &str) -> MetaResult<Self> {
        engine.resolve(name, ResolveMode::Existing)?;
        Ok(Self {
            engine,
            class: name.to_string(),
        })
    }

    /// Bound class name
    pub fn name(&self) -> &str {
        &self.class
    }

    /// Engine this handle operates on
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    // Chainable mutations

    /// Add a method; fails if the name is taken
    pub fn add_method(self, name: &str, body: MethodFn) -> MetaResult<Self> {
        self.engine.add_method(&self.class, name, body)?;
        Ok(self)
    }

    /// Replace an existing method
    pub fn override_method(self, name: &str, body: MethodFn) -> MetaResult<Self> {
        self.engine.override_method(&self.class, name, body)?;
        Ok(self)
    }

    /// Append parents
    pub fn extend(self, parents: &[&str]) -> MetaResult<Self> {
        self.engine.extend(&self.class, parents)?;
        Ok(self)
    }

    /// Attach advice to a local method
    pub fn add_hook(self, name: &str, advice: Advice) -> MetaResult<Self> {
        self.engine.add_hook(&self.class, name, advice)?;
        Ok(self)
    }

    /// Run `hook` before `name`
    pub fn before(self, name: &str, hook: MethodFn) -> MetaResult<Self> {
        self.add_hook(name, Advice::Before(hook))
    }

    /// Run `hook` after `name`
    pub fn after(self, name: &str, hook: MethodFn) -> MetaResult<Self> {
        self.add_hook(name, Advice::After(hook))
    }

    /// Wrap `name` with `hook`
    pub fn around(self, name: &str, hook: AroundFn) -> MetaResult<Self> {
        self.add_hook(name, Advice::Around(hook))
    }

    /// Install an accessor for `attribute`
    pub fn has(self, attribute: &str, options: AccessorOptions) -> MetaResult<Self> {
        self.engine.install_accessor(&self.class, attribute, options)?;
        Ok(self)
    }

    /// Install an accessor generator named `generator`
    pub fn install_generator(self, generator: &str) -> MetaResult<Self> {
        self.engine.install_generator(&self.class, generator)?;
        Ok(self)
    }

    /// Install the generic constructor
    pub fn install_constructor(self) -> MetaResult<Self> {
        self.engine.install_constructor(&self.class)?;
        Ok(self)
    }

    /// Import methods from `source`
    ///
    /// Missing names do not break the chain; they are available from
    /// [`ClassHandle::last_errors`] afterwards.
    pub fn import_from(self, source: &str, names: &[&str]) -> MetaResult<Self> {
        self.engine.import_methods(source, &self.class, names)?;
        Ok(self)
    }

    /// Forward a pragma request for the bound class
    pub fn enable_pragmas(self, enabler: &dyn PragmaEnabler) -> Self {
        self.engine.enable_pragmas(&self.class, enabler);
        self
    }

    // Queries

    /// Whether the bound class is still registered
    pub fn exists(&self) -> bool {
        self.engine.exists(&self.class)
    }

    /// Whether a method is declared locally
    pub fn has_method(&self, name: &str) -> bool {
        self.engine.has_method(&self.class, name)
    }

    /// Locally declared, non-internal method names
    pub fn methods(&self) -> MetaResult<Vec<String>> {
        self.engine.list_methods(&self.class)
    }

    /// Direct parents
    pub fn superclasses(&self) -> MetaResult<Vec<String>> {
        self.engine.superclasses(&self.class)
    }

    /// Direct children
    pub fn subclasses(&self) -> MetaResult<Vec<String>> {
        self.engine.subclasses(&self.class)
    }

    /// Linearized ancestors
    pub fn ancestors(&self) -> MetaResult<Vec<String>> {
        self.engine.ancestors(&self.class)
    }

    /// Attributes with generated accessors
    pub fn accessors(&self) -> MetaResult<Vec<String>> {
        self.engine.accessors(&self.class)
    }

    /// Number of hooks of `kind` on `name`
    pub fn hook_count(&self, name: &str, kind: HookKind) -> MetaResult<usize> {
        self.engine.hook_count(&self.class, name, kind)
    }

    /// Invoke a local method
    pub fn invoke(&self, name: &str, receiver: &Value, args: &[Value]) -> MetaResult<Value> {
        self.engine.invoke(&self.class, name, receiver, args)
    }

    /// Invoke the nearest ancestor's `name`
    pub fn call_super(&self, name: &str, receiver: &Value, args: &[Value]) -> MetaResult<Value> {
        self.engine.call_super(&self.class, name, receiver, args)
    }

    /// Build an instance through the constructor
    pub fn construct(&self, args: &[Value]) -> MetaResult<Instance> {
        self.engine.construct(&self.class, args)
    }

    /// Load the classes under the bound namespace
    pub fn load_namespaces(&self, loader: &dyn NamespaceLoader) -> MetaResult<Vec<String>> {
        self.engine.load_namespaces(&self.class, loader)
    }

    /// Failures of the most recent import
    pub fn last_errors(&self) -> Vec<ImportError> {
        self.engine.last_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetaError;

    #[test]
    fn test_new_creates_init_requires() {
        let engine = Engine::new();
        assert!(matches!(
            ClassHandle::init(&engine, "Point"),
            Err(MetaError::ClassNotFound(_))
        ));

        let handle = ClassHandle::new(&engine, "Point").unwrap();
        assert_eq!(handle.name(), "Point");
        assert!(handle.exists());
        assert!(ClassHandle::init(&engine, "Point").is_ok());
    }

    #[test]
    fn test_chain_stops_at_first_error() {
        let engine = Engine::new();
        let result = engine
            .define("Point")
            .and_then(|h| h.add_method("x", MethodFn::constant(Value::from(1))))
            .and_then(|h| h.add_method("x", MethodFn::constant(Value::from(2))))
            .and_then(|h| h.add_method("y", MethodFn::constant(Value::from(3))));

        assert!(matches!(result, Err(MetaError::MethodAlreadyExists { .. })));
        assert!(!engine.has_method("Point", "y"));
        assert_eq!(
            engine.invoke("Point", "x", &Value::Null, &[]).unwrap(),
            Value::from(1)
        );
    }

    #[test]
    fn test_import_from_keeps_chain() {
        let engine = Engine::new();
        engine
            .define("Src")
            .unwrap()
            .add_method("a", MethodFn::constant(Value::from("a")))
            .unwrap();

        let handle = engine
            .define("Dst")
            .unwrap()
            .import_from("Src", &["a", "missing"])
            .unwrap();
        assert!(handle.has_method("a"));
        assert_eq!(handle.last_errors().len(), 1);
    }
}

//! Method table operations: add, override, list, invoke, dispatch

use crate::engine::Engine;
use crate::error::{MetaError, MetaResult};
use crate::function::MethodFn;
use crate::method_table::{validate_method_name, MethodEntry, MethodKind};
use crate::value::Value;

/// A callable bound to its receiver
#[derive(Debug, Clone)]
pub struct BoundMethod {
    /// Class the method was taken from
    pub class_name: String,
    /// Method name
    pub method_name: String,
    /// Receiver passed as the implicit first argument
    pub receiver: Value,
    /// Effective callable at bind time
    pub method: MethodFn,
}

impl BoundMethod {
    /// Call with positional arguments
    pub fn call(&self, engine: &Engine, args: &[Value]) -> MetaResult<Value> {
        self.method.call(engine, &self.receiver, args)
    }
}

impl Engine {
    /// Bind `name` on `class`; fails if already bound
    pub fn add_method(&self, class: &str, name: &str, body: MethodFn) -> MetaResult<()> {
        validate_method_name(name)?;
        let class_ref = self.class(class)?;
        let mut def = class_ref.write();
        if !def
            .methods
            .insert_new(MethodEntry::new(name, MethodKind::Plain, body))
        {
            return Err(MetaError::MethodAlreadyExists {
                class: class.to_string(),
                method: name.to_string(),
            });
        }
        log::debug!("[Engine::add_method] {}::{}", class, name);
        Ok(())
    }

    /// Rebind an existing `name` on `class`, discarding the previous body and its advice
    pub fn override_method(&self, class: &str, name: &str, body: MethodFn) -> MetaResult<()> {
        validate_method_name(name)?;
        let class_ref = self.class(class)?;
        if !class_ref.read().methods.contains(name) {
            return Err(MetaError::method_not_found(class, name));
        }
        self.install_entry(class, MethodEntry::new(name, MethodKind::Plain, body))
    }

    /// Insert or replace an entry
    pub(crate) fn install_entry(&self, class: &str, entry: MethodEntry) -> MetaResult<()> {
        let class_ref = self.class(class)?;
        let name = entry.name().to_string();
        let kind = entry.kind();
        let replaced = class_ref.write().methods.replace(entry);
        match replaced {
            Some(old) if old.hooks().is_some() => log::debug!(
                "[Engine::install_entry] {}::{} ({:?}) replaced, advice dropped",
                class,
                name,
                kind
            ),
            Some(_) => log::debug!("[Engine::install_entry] {}::{} ({:?}) replaced", class, name, kind),
            None => log::debug!("[Engine::install_entry] {}::{} ({:?}) installed", class, name, kind),
        }
        Ok(())
    }

    /// Check if `class` declares `name` (inherited methods do not count)
    pub fn has_method(&self, class: &str, name: &str) -> bool {
        let Ok(class_ref) = self.class(class) else {
            return false;
        };
        let def = class_ref.read();
        def.methods.contains(name)
    }

    /// Locally declared method names, excluding internal entries
    pub fn list_methods(&self, class: &str) -> MetaResult<Vec<String>> {
        let class_ref = self.class(class)?;
        let prefix = self.options.internal_prefix.as_str();
        let def = class_ref.read();
        Ok(def
            .methods
            .names()
            .filter(|name| !name.starts_with(prefix))
            .map(str::to_string)
            .collect())
    }

    /// Kind of a locally declared method
    pub fn method_kind(&self, class: &str, name: &str) -> MetaResult<MethodKind> {
        let class_ref = self.class(class)?;
        let def = class_ref.read();
        def.methods
            .get(name)
            .map(|e| e.kind())
            .ok_or_else(|| MetaError::method_not_found(class, name))
    }

    /// Effective callable declared on `class`, if any
    pub(crate) fn local_method(&self, class: &str, name: &str) -> Option<MethodFn> {
        let class_ref = self.class(class).ok()?;
        let def = class_ref.read();
        def.methods.get(name).map(|e| e.callable().clone())
    }

    /// Effective callable declared on `class`
    pub fn method(&self, class: &str, name: &str) -> MetaResult<MethodFn> {
        let class_ref = self.class(class)?;
        let def = class_ref.read();
        def.methods
            .get(name)
            .map(|e| e.callable().clone())
            .ok_or_else(|| MetaError::method_not_found(class, name))
    }

    /// Bind a locally declared method to a receiver
    pub fn bound_method(&self, class: &str, name: &str, receiver: Value) -> MetaResult<BoundMethod> {
        Ok(BoundMethod {
            class_name: class.to_string(),
            method_name: name.to_string(),
            receiver,
            method: self.method(class, name)?,
        })
    }

    /// Call a method declared on `class` itself (ancestors are not searched)
    pub fn invoke(&self, class: &str, name: &str, receiver: &Value, args: &[Value]) -> MetaResult<Value> {
        let method = self.method(class, name)?;
        log::trace!("[Engine::invoke] {}::{} ({} args)", class, name, args.len());
        method.call(self, receiver, args)
    }

    /// Class a receiver dispatches on
    pub fn class_of(&self, receiver: &Value) -> MetaResult<String> {
        match receiver {
            Value::Object(instance) => Ok(instance.class_name()),
            Value::Class(name) => Ok(name.clone()),
            other => Err(MetaError::TypeError(format!(
                "cannot dispatch on a {} receiver",
                other.type_name()
            ))),
        }
    }

    /// Class that provides `name` for `class`: itself or the first ancestor
    pub fn can(&self, class: &str, name: &str) -> MetaResult<Option<String>> {
        if self.has_method(class, name) {
            return Ok(Some(class.to_string()));
        }
        Ok(self
            .ancestors(class)?
            .into_iter()
            .find(|ancestor| self.has_method(ancestor, name)))
    }

    /// Dispatch on the receiver's class, searching its ancestors
    pub fn call_method(&self, receiver: &Value, name: &str, args: &[Value]) -> MetaResult<Value> {
        let class = self.class_of(receiver)?;
        match self.can(&class, name)? {
            Some(owner) => {
                log::trace!("[Engine::call_method] {}->{} resolved in {}", class, name, owner);
                self.invoke(&owner, name, receiver, args)
            }
            None => Err(MetaError::method_not_found(&class, name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_registry::ResolveMode;

    fn engine_with(classes: &[&str]) -> Engine {
        let engine = Engine::new();
        for class in classes {
            engine.resolve(class, ResolveMode::Create).unwrap();
        }
        engine
    }

    #[test]
    fn test_add_then_add_fails() {
        let engine = engine_with(&["Greeter"]);
        engine
            .add_method("Greeter", "greet", MethodFn::constant(Value::from("hi")))
            .unwrap();
        let err = engine
            .add_method("Greeter", "greet", MethodFn::constant(Value::from("yo")))
            .unwrap_err();

        assert!(matches!(err, MetaError::MethodAlreadyExists { .. }));
        let result = engine.invoke("Greeter", "greet", &Value::Null, &[]).unwrap();
        assert_eq!(result, Value::from("hi"));
    }

    #[test]
    fn test_override_replaces() {
        let engine = engine_with(&["Greeter"]);
        engine
            .add_method("Greeter", "greet", MethodFn::constant(Value::from("hi")))
            .unwrap();
        engine
            .override_method("Greeter", "greet", MethodFn::constant(Value::from("yo")))
            .unwrap();

        let result = engine.invoke("Greeter", "greet", &Value::Null, &[]).unwrap();
        assert_eq!(result, Value::from("yo"));
        assert_eq!(engine.list_methods("Greeter").unwrap(), vec!["greet"]);
    }

    #[test]
    fn test_override_requires_existing_method() {
        let engine = engine_with(&["Greeter"]);
        let err = engine
            .override_method("Greeter", "ghost", MethodFn::constant(Value::Null))
            .unwrap_err();

        assert_eq!(err, MetaError::method_not_found("Greeter", "ghost"));
        assert!(!engine.has_method("Greeter", "ghost"));
        assert!(engine.list_methods("Greeter").unwrap().is_empty());
    }

    #[test]
    fn test_method_names_are_identifiers() {
        let engine = engine_with(&["Greeter"]);
        for name in ["", "say hi", "2fast", "a-b"] {
            let err = engine
                .add_method("Greeter", name, MethodFn::constant(Value::Null))
                .unwrap_err();
            assert_eq!(err, MetaError::InvalidMethodName(name.to_string()));
        }
        engine
            .add_method("Greeter", "greet", MethodFn::constant(Value::Null))
            .unwrap();
        assert!(matches!(
            engine.override_method("Greeter", "gr eet", MethodFn::constant(Value::Null)),
            Err(MetaError::InvalidMethodName(_))
        ));
        assert_eq!(engine.list_methods("Greeter").unwrap(), vec!["greet"]);
    }

    #[test]
    fn test_unknown_class() {
        let engine = Engine::new();
        let err = engine
            .add_method("Ghost", "boo", MethodFn::constant(Value::Null))
            .unwrap_err();
        assert_eq!(err, MetaError::ClassNotFound("Ghost".to_string()));
        assert!(!engine.has_method("Ghost", "boo"));
    }

    #[test]
    fn test_list_hides_internal_names() {
        let engine = engine_with(&["Point"]);
        for name in ["x", "__meta", "y", "_private"] {
            engine.add_method("Point", name, MethodFn::constant(Value::Null)).unwrap();
        }
        assert_eq!(engine.list_methods("Point").unwrap(), vec!["x", "y", "_private"]);
    }

    #[test]
    fn test_invoke_passes_receiver_and_args() {
        let engine = engine_with(&["Calc"]);
        engine
            .add_method(
                "Calc",
                "add",
                MethodFn::new(|_, receiver, args| {
                    let base = receiver.as_int().unwrap_or(0);
                    let sum: i64 = args.iter().filter_map(Value::as_int).sum();
                    Ok(Value::from(base + sum))
                }),
            )
            .unwrap();

        let result = engine
            .invoke("Calc", "add", &Value::from(10), &[Value::from(1), Value::from(2)])
            .unwrap();
        assert_eq!(result, Value::from(13));
    }

    #[test]
    fn test_invoke_missing_method() {
        let engine = engine_with(&["Calc"]);
        let err = engine.invoke("Calc", "nope", &Value::Null, &[]).unwrap_err();
        assert_eq!(err, MetaError::method_not_found("Calc", "nope"));
    }

    #[test]
    fn test_bound_method() {
        let engine = engine_with(&["Echo"]);
        engine
            .add_method("Echo", "me", MethodFn::new(|_, receiver, _| Ok(receiver.clone())))
            .unwrap();

        let bound = engine.bound_method("Echo", "me", Value::from("self")).unwrap();
        assert_eq!(bound.call(&engine, &[]).unwrap(), Value::from("self"));
    }

    #[test]
    fn test_body_may_mutate_its_own_class() {
        let engine = engine_with(&["Lazy"]);
        engine
            .add_method(
                "Lazy",
                "init",
                MethodFn::new(|engine, _, _| {
                    engine.override_method("Lazy", "init", MethodFn::constant(Value::from(2)))?;
                    Ok(Value::from(1))
                }),
            )
            .unwrap();

        assert_eq!(engine.invoke("Lazy", "init", &Value::Null, &[]).unwrap(), Value::from(1));
        assert_eq!(engine.invoke("Lazy", "init", &Value::Null, &[]).unwrap(), Value::from(2));
    }

    #[test]
    fn test_class_of() {
        let engine = Engine::new();
        assert_eq!(engine.class_of(&Value::class("A")).unwrap(), "A");
        assert!(matches!(
            engine.class_of(&Value::from(1)),
            Err(MetaError::TypeError(_))
        ));
    }
}

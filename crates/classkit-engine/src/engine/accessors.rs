//! Accessor generators and generated accessors

use crate::accessor::{accessor_method, AccessorOptions};
use crate::engine::Engine;
use crate::error::{MetaError, MetaResult};
use crate::function::MethodFn;
use crate::method_table::{validate_method_name, MethodEntry, MethodKind};
use crate::value::Value;

impl Engine {
    /// Install a generated entry, refusing to clobber a hand-written method
    ///
    /// An existing entry of the same kind is replaced. Anything else is only
    /// replaced when `protect_methods` is off.
    fn install_generated(&self, class: &str, entry: MethodEntry) -> MetaResult<()> {
        let class_ref = self.class(class)?;
        let existing = class_ref.read().methods.get(entry.name()).map(|e| e.kind());
        if let Some(kind) = existing {
            if kind != entry.kind() && self.options.protect_methods {
                return Err(MetaError::MethodAlreadyExists {
                    class: class.to_string(),
                    method: entry.name().to_string(),
                });
            }
        }
        self.install_entry(class, entry)
    }

    /// Install a combined getter/setter for `attribute` on `class`
    pub fn install_accessor(
        &self,
        class: &str,
        attribute: &str,
        options: AccessorOptions,
    ) -> MetaResult<()> {
        validate_method_name(attribute)?;
        let body = accessor_method(attribute, options);
        self.install_generated(class, MethodEntry::new(attribute, MethodKind::Accessor, body))?;
        self.class(class)?.write().record_accessor(attribute);
        Ok(())
    }

    /// Install an accessor generator named `generator` on `class`
    ///
    /// The generator is called with the consuming class as receiver (a class
    /// reference or one of its instances) and `(attribute, options?)`, where
    /// `attribute` is a name or a list of names. It installs the accessors on
    /// the consuming class and returns that class.
    pub fn install_generator(&self, class: &str, generator: &str) -> MetaResult<()> {
        validate_method_name(generator)?;
        let generator_name = generator.to_string();
        let body = MethodFn::new(move |engine, receiver, args| {
            let target = engine.class_of(receiver)?;
            let (names, options) = match args {
                [names] => (names, Value::Null),
                [names, options] => (names, options.clone()),
                _ => {
                    return Err(MetaError::TypeError(format!(
                        "{} expects (attribute, options?), got {} arguments",
                        generator_name,
                        args.len()
                    )))
                }
            };
            let options = AccessorOptions::from_value(&options)?;
            for attribute in attribute_names(names)? {
                engine.install_accessor(&target, &attribute, options.clone())?;
            }
            Ok(Value::Class(target))
        });
        self.install_generated(class, MethodEntry::new(generator, MethodKind::Generator, body))
    }

    /// Attributes with generated accessors on `class`
    pub fn accessors(&self, class: &str) -> MetaResult<Vec<String>> {
        let class_ref = self.class(class)?;
        let accessors = class_ref.read().accessors.clone();
        Ok(accessors)
    }
}

fn attribute_names(names: &Value) -> MetaResult<Vec<String>> {
    let invalid = || {
        MetaError::TypeError(format!(
            "attribute name must be a string or a list of strings, got {}",
            names.type_name()
        ))
    };
    match names {
        Value::Str(name) => Ok(vec![name.clone()]),
        Value::List(list) => list
            .read()
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_registry::ResolveMode;
    use crate::object::Instance;

    fn engine_with(classes: &[&str]) -> Engine {
        let engine = Engine::new();
        for class in classes {
            engine.resolve(class, ResolveMode::Create).unwrap();
        }
        engine
    }

    #[test]
    fn test_generator_installs_on_caller() {
        let engine = engine_with(&["Base", "Person"]);
        engine.install_generator("Base", "has").unwrap();

        let result = engine
            .invoke(
                "Base",
                "has",
                &Value::class("Person"),
                &[Value::from("name"), Value::map([("default", Value::from("anon"))])],
            )
            .unwrap();

        assert_eq!(result, Value::class("Person"));
        assert!(engine.has_method("Person", "name"));
        assert!(!engine.has_method("Base", "name"));
        assert_eq!(engine.accessors("Person").unwrap(), vec!["name"]);

        let person = Value::from(Instance::new("Person"));
        assert_eq!(
            engine.invoke("Person", "name", &person, &[]).unwrap(),
            Value::from("anon")
        );
    }

    #[test]
    fn test_generator_accepts_name_list() {
        let engine = engine_with(&["Point"]);
        engine.install_generator("Point", "has").unwrap();
        engine
            .invoke(
                "Point",
                "has",
                &Value::class("Point"),
                &[Value::list(vec![Value::from("x"), Value::from("y")])],
            )
            .unwrap();

        assert_eq!(engine.accessors("Point").unwrap(), vec!["x", "y"]);
        assert_eq!(engine.list_methods("Point").unwrap(), vec!["has", "x", "y"]);
    }

    #[test]
    fn test_generator_bad_arguments() {
        let engine = engine_with(&["Point"]);
        engine.install_generator("Point", "has").unwrap();

        let err = engine
            .invoke("Point", "has", &Value::class("Point"), &[])
            .unwrap_err();
        assert!(matches!(err, MetaError::TypeError(_)));

        let err = engine
            .invoke("Point", "has", &Value::from(1), &[Value::from("x")])
            .unwrap_err();
        assert!(matches!(err, MetaError::TypeError(_)));
    }

    #[test]
    fn test_accessor_does_not_clobber_hand_written() {
        let engine = engine_with(&["Point"]);
        engine
            .add_method("Point", "x", MethodFn::constant(Value::from("hand")))
            .unwrap();

        let err = engine
            .install_accessor("Point", "x", AccessorOptions::rw())
            .unwrap_err();
        assert!(matches!(err, MetaError::MethodAlreadyExists { .. }));
        assert!(engine.accessors("Point").unwrap().is_empty());

        // Re-declaring an accessor is allowed
        engine.install_accessor("Point", "y", AccessorOptions::rw()).unwrap();
        engine.install_accessor("Point", "y", AccessorOptions::ro()).unwrap();
        assert_eq!(engine.accessors("Point").unwrap(), vec!["y"]);
    }

    #[test]
    fn test_unprotected_engine_replaces() {
        let options = crate::config::EngineOptions {
            protect_methods: false,
            ..Default::default()
        };
        let engine = Engine::with_options(options).unwrap();
        engine.resolve("Point", ResolveMode::Create).unwrap();
        engine
            .add_method("Point", "x", MethodFn::constant(Value::from("hand")))
            .unwrap();
        engine.install_accessor("Point", "x", AccessorOptions::rw()).unwrap();

        assert_eq!(engine.method_kind("Point", "x").unwrap(), MethodKind::Accessor);
    }

    #[test]
    fn test_invalid_attribute_name() {
        let engine = engine_with(&["Point"]);
        let err = engine
            .install_accessor("Point", "not valid", AccessorOptions::rw())
            .unwrap_err();
        assert_eq!(err, MetaError::InvalidMethodName("not valid".to_string()));
        assert!(matches!(
            engine.install_generator("Point", "has-a"),
            Err(MetaError::InvalidMethodName(_))
        ));
    }
}

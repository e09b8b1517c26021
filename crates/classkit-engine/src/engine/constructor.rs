//! Generated constructors

use crate::clone::deep_clone;
use crate::engine::Engine;
use crate::error::{MetaError, MetaResult};
use crate::function::MethodFn;
use crate::method_table::{MethodEntry, MethodKind};
use crate::object::Instance;
use crate::value::Value;

impl Engine {
    /// Install the generic constructor on `class`, replacing any previous one
    ///
    /// The constructor returns a fresh instance. Called on a class reference
    /// it tags the instance with that class, so an inherited constructor
    /// builds the subclass; otherwise the instance gets `class`. An optional
    /// map argument seeds the attributes.
    pub fn install_constructor(&self, class: &str) -> MetaResult<()> {
        self.class(class)?;
        let owner = class.to_string();
        let body = MethodFn::new(move |_, receiver, args| {
            let class_name = receiver.as_class_name().unwrap_or(&owner);
            let instance = Instance::new(class_name);
            match args {
                [] => {}
                [Value::Map(init)] => {
                    let init = init.read().clone();
                    for (name, value) in init {
                        instance.set(name, deep_clone(&value));
                    }
                }
                _ => {
                    return Err(MetaError::TypeError(format!(
                        "constructor of {} takes an optional attribute map",
                        class_name
                    )))
                }
            }
            Ok(Value::Object(instance))
        });
        let name = self.options.constructor_name.clone();
        self.install_entry(class, MethodEntry::new(name, MethodKind::Constructor, body))
    }

    /// Call the constructor of `class` (inherited constructors included)
    pub fn construct(&self, class: &str, args: &[Value]) -> MetaResult<Instance> {
        let receiver = Value::class(class);
        let result = self.call_method(&receiver, &self.options.constructor_name, args)?;
        match result {
            Value::Object(instance) => Ok(instance),
            other => Err(MetaError::TypeError(format!(
                "constructor of {} returned a {}",
                class,
                other.type_name()
            ))),
        }
    }
}

//! Generated attribute accessors
//!
//! An accessor is a single method that reads the attribute when called with
//! no argument and writes it when called with one. Unset attributes are
//! initialised lazily from the declared default on first read.

use crate::clone::deep_clone;
use crate::error::{MetaError, MetaResult};
use crate::function::MethodFn;
use crate::value::Value;

/// Whether an accessor accepts a new value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mutability {
    /// Read and write (`is => 'rw'`)
    #[default]
    ReadWrite,
    /// Read only (`is => 'ro'`)
    ReadOnly,
}

impl Mutability {
    fn parse(value: &str) -> MetaResult<Self> {
        match value {
            "rw" => Ok(Mutability::ReadWrite),
            "ro" => Ok(Mutability::ReadOnly),
            other => Err(MetaError::InvalidOption(format!(
                "'is' must be 'rw' or 'ro', got '{}'",
                other
            ))),
        }
    }
}

/// Default used to populate an unset attribute
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// Copied into each instance on first read
    Value(Value),
    /// Called with the instance as receiver and no arguments
    Producer(MethodFn),
}

/// Declarative accessor options
#[derive(Debug, Clone, Default)]
pub struct AccessorOptions {
    /// Lazy default
    pub default: Option<DefaultValue>,
    /// Read/write mode
    pub mutability: Mutability,
}

impl AccessorOptions {
    /// Read-write accessor without default
    pub fn rw() -> Self {
        Self::default()
    }

    /// Read-only accessor without default
    pub fn ro() -> Self {
        Self {
            default: None,
            mutability: Mutability::ReadOnly,
        }
    }

    /// Set a value default
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Set a producer default
    pub fn with_default_fn(mut self, producer: MethodFn) -> Self {
        self.default = Some(DefaultValue::Producer(producer));
        self
    }

    /// Parse an options map: `{ default: <value | code>, is: "rw" | "ro" }`
    ///
    /// `Null` means no options.
    pub fn from_value(options: &Value) -> MetaResult<Self> {
        let map = match options {
            Value::Null => return Ok(Self::default()),
            Value::Map(map) => map.read().clone(),
            other => {
                return Err(MetaError::InvalidOption(format!(
                    "accessor options must be a map, got {}",
                    other.type_name()
                )))
            }
        };

        let mut parsed = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "default" => {
                    parsed.default = Some(match value {
                        Value::Code(producer) => DefaultValue::Producer(producer),
                        other => DefaultValue::Value(other),
                    });
                }
                "is" => {
                    let mode = value.as_str().ok_or_else(|| {
                        MetaError::InvalidOption(format!(
                            "'is' must be a string, got {}",
                            value.type_name()
                        ))
                    })?;
                    parsed.mutability = Mutability::parse(mode)?;
                }
                other => {
                    return Err(MetaError::InvalidOption(format!(
                        "unknown accessor option '{}'",
                        other
                    )))
                }
            }
        }
        Ok(parsed)
    }
}

/// Build the combined getter/setter body for `attribute`
pub(crate) fn accessor_method(attribute: &str, options: AccessorOptions) -> MethodFn {
    let attribute = attribute.to_string();
    MethodFn::new(move |engine, receiver, args| {
        let instance = receiver.as_instance().ok_or_else(|| {
            MetaError::TypeError(format!(
                "accessor '{}' called on a {} receiver",
                attribute,
                receiver.type_name()
            ))
        })?;

        match args {
            [] => {
                if let Some(value) = instance.get(&attribute) {
                    return Ok(value);
                }
                // Computed without holding the instance lock: a producer may
                // read other attributes of the same instance.
                let value = match &options.default {
                    Some(DefaultValue::Value(value)) => deep_clone(value),
                    Some(DefaultValue::Producer(producer)) => producer.call(engine, receiver, &[])?,
                    None => return Ok(Value::Null),
                };
                instance.set(attribute.clone(), value.clone());
                Ok(value)
            }
            [value] => {
                if options.mutability == Mutability::ReadOnly {
                    return Err(MetaError::ReadOnlyAttribute {
                        class: instance.class_name(),
                        attribute: attribute.clone(),
                    });
                }
                instance.set(attribute.clone(), value.clone());
                Ok(value.clone())
            }
            _ => Err(MetaError::TypeError(format!(
                "accessor '{}' takes at most one argument, got {}",
                attribute,
                args.len()
            ))),
        }
    })
}

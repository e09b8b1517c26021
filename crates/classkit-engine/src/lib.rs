//! Classkit Engine
//!
//! A runtime object-protocol engine: classes are explicit dispatch tables
//! living in a registry owned by an [`Engine`], and can be created, extended
//! and rewired while the program runs.
//!
//! - **Registry**: lazy class creation and existence queries (`class_registry`)
//! - **Method tables**: add / override / list / invoke (`method_table`)
//! - **Inheritance**: extend, ancestors, descendants, super dispatch
//! - **Hooks**: before / after / around advice composed at install time (`hooks`)
//! - **Accessors**: generated get/set methods with defaults (`accessor`)
//! - **Cloning**: structural deep copy of instance graphs (`clone`)
//!
//! # Example
//!
//! ```rust,ignore
//! use classkit_engine::{AroundFn, Engine, MethodFn, Value};
//!
//! let engine = Engine::new();
//! engine
//!     .define("Animal")?
//!     .install_constructor()?
//!     .add_method("speak", MethodFn::new(|_, _, _| Ok(Value::from("..."))))?;
//!
//! engine
//!     .define("Dog")?
//!     .extend(&["Animal"])?
//!     .around("speak", AroundFn::new(|engine, next, this, args| {
//!         let base = next.call(engine, this, args)?;
//!         Ok(Value::from(format!("woof {}", base.as_str().unwrap_or(""))))
//!     }))?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![allow(clippy::new_ret_no_self)]

// ============================================================================
// Core Modules
// ============================================================================

/// Dynamic values passed to and returned from methods
pub mod value;

/// Object instances and their attribute stores
pub mod object;

/// Callable method bodies
pub mod function;

/// Class definitions and the name-keyed registry
pub mod class_registry;

/// Per-class method tables
pub mod method_table;

/// Before / after / around advice chains
pub mod hooks;

/// Generated accessor methods
pub mod accessor;

/// Structural deep copy of values and instances
pub mod clone;

/// The engine service and its operations
pub mod engine;

/// Chainable per-class handles
pub mod handle;

/// Namespace loading and pragma collaborators
pub mod namespace;

/// Engine configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports
// ============================================================================

pub use accessor::{AccessorOptions, DefaultValue, Mutability};
pub use class_registry::{ClassDefinition, ClassRef, ClassRegistry, ResolveMode};
pub use clone::{clone_instance, deep_clone};
pub use config::{ConfigError, EngineOptions};
pub use engine::{BoundMethod, Engine, ImportOutcome, ImportReport};
pub use error::{ImportError, MetaError, MetaResult};
pub use function::MethodFn;
pub use handle::ClassHandle;
pub use hooks::{Advice, AroundFn, HookChain, HookKind, Next};
pub use method_table::{validate_method_name, MethodEntry, MethodKind, MethodTable};
pub use namespace::{LogPragmas, NamespaceLoader, PragmaEnabler, StaticNamespaceLoader};
pub use object::{Instance, Object};
pub use value::{ListRef, MapRef, Value};

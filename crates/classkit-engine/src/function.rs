//! Callable method bodies
//!
//! Every method, accessor, constructor and hook is a [`MethodFn`]: a shared
//! closure receiving the engine, the receiver and the positional arguments.

use crate::engine::Engine;
use crate::error::MetaResult;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by all method bodies
pub type NativeMethod = dyn Fn(&Engine, &Value, &[Value]) -> MetaResult<Value> + Send + Sync;

/// Reference-counted method body
#[derive(Clone)]
pub struct MethodFn(Arc<NativeMethod>);

impl MethodFn {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Engine, &Value, &[Value]) -> MetaResult<Value> + Send + Sync + 'static,
    {
        MethodFn(Arc::new(f))
    }

    /// Body that always returns a fixed value
    pub fn constant(value: Value) -> Self {
        MethodFn::new(move |_, _, _| Ok(value.clone()))
    }

    /// Call with an explicit receiver
    pub fn call(&self, engine: &Engine, receiver: &Value, args: &[Value]) -> MetaResult<Value> {
        (self.0)(engine, receiver, args)
    }

    /// Check whether two bodies are the same closure
    pub fn ptr_eq(&self, other: &MethodFn) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for MethodFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<code {:p}>", Arc::as_ptr(&self.0) as *const ())
    }
}

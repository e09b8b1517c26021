//! Method advice: before / after / around
//!
//! Advice is composed when it is installed. [`HookChain::compose`] wraps the
//! original body in the around hooks (first installed outermost), then
//! surrounds that with the before hooks and after hooks, each list running
//! in installation order:
//!
//! ```text
//! before[0] .. before[n]  ->  around[0](around[1](.. body ..))  ->  after[0] .. after[n]
//! ```
//!
//! Before and after hooks see the same receiver and arguments as the
//! original call; their results are discarded. The value returned to the
//! caller is whatever the around nest (or the body) returned.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::engine::Engine;
use crate::error::{MetaError, MetaResult};
use crate::function::MethodFn;
use crate::value::Value;

/// Advice type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs before the method
    Before,
    /// Runs after the method
    After,
    /// Wraps the method
    Around,
}

impl HookKind {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            HookKind::Before => "before",
            HookKind::After => "after",
            HookKind::Around => "around",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = MetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(HookKind::Before),
            "after" => Ok(HookKind::After),
            "around" => Ok(HookKind::Around),
            other => Err(MetaError::InvalidOption(format!(
                "unknown hook type '{}'",
                other
            ))),
        }
    }
}

/// Continuation handed to around advice
#[derive(Debug, Clone)]
pub struct Next {
    inner: MethodFn,
}

impl Next {
    /// Continue with the wrapped logic
    pub fn call(&self, engine: &Engine, receiver: &Value, args: &[Value]) -> MetaResult<Value> {
        self.inner.call(engine, receiver, args)
    }
}

/// Signature of around advice
pub type NativeAround =
    dyn Fn(&Engine, &Next, &Value, &[Value]) -> MetaResult<Value> + Send + Sync;

/// Reference-counted around advice
#[derive(Clone)]
pub struct AroundFn(Arc<NativeAround>);

impl AroundFn {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Engine, &Next, &Value, &[Value]) -> MetaResult<Value> + Send + Sync + 'static,
    {
        AroundFn(Arc::new(f))
    }

    fn call(&self, engine: &Engine, next: &Next, receiver: &Value, args: &[Value]) -> MetaResult<Value> {
        (self.0)(engine, next, receiver, args)
    }
}

impl fmt::Debug for AroundFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<around {:p}>", Arc::as_ptr(&self.0) as *const ())
    }
}

/// One piece of advice
#[derive(Debug, Clone)]
pub enum Advice {
    /// Before advice
    Before(MethodFn),
    /// After advice
    After(MethodFn),
    /// Around advice
    Around(AroundFn),
}

impl Advice {
    /// Advice type
    pub fn kind(&self) -> HookKind {
        match self {
            Advice::Before(_) => HookKind::Before,
            Advice::After(_) => HookKind::After,
            Advice::Around(_) => HookKind::Around,
        }
    }
}

/// Accumulated advice for one method
#[derive(Debug, Clone, Default)]
pub struct HookChain {
    before: Vec<MethodFn>,
    after: Vec<MethodFn>,
    around: Vec<AroundFn>,
}

impl HookChain {
    /// Append advice after any of the same type
    pub fn push(&mut self, advice: Advice) {
        match advice {
            Advice::Before(f) => self.before.push(f),
            Advice::After(f) => self.after.push(f),
            Advice::Around(f) => self.around.push(f),
        }
    }

    /// Number of hooks of one type
    pub fn count(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::Before => self.before.len(),
            HookKind::After => self.after.len(),
            HookKind::Around => self.around.len(),
        }
    }

    /// Total number of hooks
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len() + self.around.len()
    }

    /// Check if no advice is present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the effective callable for `body`
    pub fn compose(&self, body: &MethodFn) -> MethodFn {
        let mut core = body.clone();
        for around in self.around.iter().rev() {
            let next = Next { inner: core };
            let around = around.clone();
            core = MethodFn::new(move |engine, receiver, args| {
                around.call(engine, &next, receiver, args)
            });
        }

        if self.before.is_empty() && self.after.is_empty() {
            return core;
        }

        let before = self.before.clone();
        let after = self.after.clone();
        MethodFn::new(move |engine, receiver, args| {
            for hook in &before {
                hook.call(engine, receiver, args)?;
            }
            let result = core.call(engine, receiver, args)?;
            for hook in &after {
                hook.call(engine, receiver, args)?;
            }
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> MethodFn {
        let log = log.clone();
        let tag = tag.to_string();
        MethodFn::new(move |_, _, _| {
            log.lock().push(tag.clone());
            Ok(Value::from(tag.clone()))
        })
    }

    #[test]
    fn test_hook_kind_parse() {
        assert_eq!("before".parse::<HookKind>().unwrap(), HookKind::Before);
        assert_eq!("around".parse::<HookKind>().unwrap(), HookKind::Around);
        assert!("during".parse::<HookKind>().is_err());
        assert_eq!(HookKind::After.to_string(), "after");
    }

    #[test]
    fn test_empty_chain_returns_body() {
        let body = MethodFn::constant(Value::from(1));
        let chain = HookChain::default();
        assert!(chain.is_empty());
        assert!(chain.compose(&body).ptr_eq(&body));
    }

    #[test]
    fn test_full_ordering() {
        let engine = Engine::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = HookChain::default();

        chain.push(Advice::After(recorder(&log, "after1")));
        chain.push(Advice::Before(recorder(&log, "before1")));
        for tag in ["outer", "inner"] {
            let log = log.clone();
            chain.push(Advice::Around(AroundFn::new(move |engine, next, recv, args| {
                log.lock().push(format!("{}:enter", tag));
                let result = next.call(engine, recv, args)?;
                log.lock().push(format!("{}:exit", tag));
                Ok(result)
            })));
        }
        chain.push(Advice::Before(recorder(&log, "before2")));
        chain.push(Advice::After(recorder(&log, "after2")));

        let effective = chain.compose(&recorder(&log, "body"));
        let result = effective.call(&engine, &Value::Null, &[]).unwrap();

        assert_eq!(result, Value::from("body"));
        assert_eq!(
            *log.lock(),
            vec![
                "before1", "before2", "outer:enter", "inner:enter", "body", "inner:exit",
                "outer:exit", "after1", "after2",
            ]
        );
        assert_eq!(chain.count(HookKind::Around), 2);
        assert_eq!(chain.len(), 6);
    }

    #[test]
    fn test_failing_before_aborts() {
        let engine = Engine::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = HookChain::default();
        chain.push(Advice::Before(MethodFn::new(|_, _, _| {
            Err(MetaError::runtime("denied"))
        })));

        let effective = chain.compose(&recorder(&log, "body"));
        let err = effective.call(&engine, &Value::Null, &[]).unwrap_err();

        assert_eq!(err, MetaError::runtime("denied"));
        assert!(log.lock().is_empty());
    }
}

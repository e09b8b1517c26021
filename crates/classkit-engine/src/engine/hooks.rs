//! Advice installation

use crate::engine::Engine;
use crate::error::{MetaError, MetaResult};
use crate::hooks::{Advice, HookKind};

impl Engine {
    /// Attach advice to a method declared on `class`
    ///
    /// Hooks only modify existing behaviour: the method must already be
    /// declared on `class` itself.
    pub fn add_hook(&self, class: &str, name: &str, advice: Advice) -> MetaResult<()> {
        let class_ref = self.class(class)?;
        let mut def = class_ref.write();
        let entry = def
            .methods
            .get_mut(name)
            .ok_or_else(|| MetaError::method_not_found(class, name))?;
        let kind = advice.kind();
        entry.add_advice(advice);
        log::debug!(
            "[Engine::add_hook] {} hook #{} on {}::{}",
            kind,
            entry.hooks().map_or(0, |chain| chain.count(kind)),
            class,
            name
        );
        Ok(())
    }

    /// Number of hooks of `kind` on a method (0 when it has no advice)
    pub fn hook_count(&self, class: &str, name: &str, kind: HookKind) -> MetaResult<usize> {
        let class_ref = self.class(class)?;
        let def = class_ref.read();
        let entry = def
            .methods
            .get(name)
            .ok_or_else(|| MetaError::method_not_found(class, name))?;
        Ok(entry.hooks().map_or(0, |chain| chain.count(kind)))
    }

    /// Whether a method carries any advice
    pub fn has_hooks(&self, class: &str, name: &str) -> bool {
        let Ok(class_ref) = self.class(class) else {
            return false;
        };
        let def = class_ref.read();
        def.methods
            .get(name)
            .is_some_and(|entry| entry.hooks().is_some())
    }
}

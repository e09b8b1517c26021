//! Namespace loading and pragma forwarding

use crate::class_registry::ResolveMode;
use crate::engine::Engine;
use crate::error::MetaResult;
use crate::namespace::{NamespaceLoader, PragmaEnabler};

impl Engine {
    /// Register every class the loader finds under `root`
    ///
    /// Returns the loaded names in loader order. A namespace without
    /// children yields an empty list.
    pub fn load_namespaces(&self, root: &str, loader: &dyn NamespaceLoader) -> MetaResult<Vec<String>> {
        let children = loader.children(root);
        for name in &children {
            self.resolve(name, ResolveMode::Create)?;
        }
        log::debug!(
            "[Engine::load_namespaces] {} class(es) under {}",
            children.len(),
            root
        );
        Ok(children)
    }

    /// Forward a pragma request for `module`
    pub fn enable_pragmas(&self, module: &str, enabler: &dyn PragmaEnabler) {
        enabler.enable(module);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetaError;
    use crate::namespace::StaticNamespaceLoader;
    use parking_lot::Mutex;

    struct Recorder(Mutex<Vec<String>>);

    impl PragmaEnabler for Recorder {
        fn enable(&self, module: &str) {
            self.0.lock().push(module.to_string());
        }
    }

    #[test]
    fn test_load_registers_children() {
        let engine = Engine::new();
        let loader = StaticNamespaceLoader::new(["Shop::Cart", "Shop::Item"]);

        let loaded = engine.load_namespaces("Shop", &loader).unwrap();
        assert_eq!(loaded, vec!["Shop::Cart", "Shop::Item"]);
        assert!(engine.exists("Shop::Cart"));
        assert!(engine.exists("Shop::Item"));
        assert!(!engine.exists("Shop"));

        assert!(engine.load_namespaces("Empty", &loader).unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_bad_names() {
        let engine = Engine::new();
        let loader = StaticNamespaceLoader::new(["Shop::9lives"]);
        let err = engine.load_namespaces("Shop", &loader).unwrap_err();
        assert!(matches!(err, MetaError::InvalidClassName(_)));
    }

    #[test]
    fn test_enable_pragmas_forwards() {
        let engine = Engine::new();
        let recorder = Recorder(Mutex::new(Vec::new()));
        engine.enable_pragmas("main", &recorder);
        assert_eq!(*recorder.0.lock(), vec!["main".to_string()]);
    }
}

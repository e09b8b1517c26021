//! Collaborators for namespace discovery and pragma enabling
//!
//! The engine never searches a filesystem or toggles language pragmas
//! itself. It asks a [`NamespaceLoader`] for class names and forwards
//! pragma requests to a [`PragmaEnabler`].

use rustc_hash::FxHashSet;

/// Discovers the classes that live under a namespace
pub trait NamespaceLoader {
    /// Fully qualified names of the direct children of `namespace`
    fn children(&self, namespace: &str) -> Vec<String>;
}

/// Enables pragmas in a calling module
pub trait PragmaEnabler {
    /// Enable the pragmas for `module`
    fn enable(&self, module: &str);
}

/// Loader over a fixed, in-memory list of class names
#[derive(Debug, Clone, Default)]
pub struct StaticNamespaceLoader {
    names: Vec<String>,
}

impl StaticNamespaceLoader {
    /// Create a loader; duplicate names are dropped, first occurrence kept
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut seen = FxHashSet::default();
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { names }
    }

    /// Known names
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl NamespaceLoader for StaticNamespaceLoader {
    fn children(&self, namespace: &str) -> Vec<String> {
        let prefix = format!("{}::", namespace);
        self.names
            .iter()
            .filter(|name| {
                name.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains("::"))
            })
            .cloned()
            .collect()
    }
}

/// Enabler that only records requests in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPragmas;

impl PragmaEnabler for LogPragmas {
    fn enable(&self, module: &str) {
        log::debug!("[LogPragmas::enable] pragmas enabled for {}", module);
    }
}

//! Copying methods between classes

use crate::engine::Engine;
use crate::error::{ImportError, MetaError, MetaResult};
use crate::method_table::{MethodEntry, MethodKind};

/// Outcome for one imported name
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Method name
    pub name: String,
    /// `Ok` if the method is now installed on the destination
    pub result: Result<(), MetaError>,
}

/// Per-name outcomes of a batch import, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Outcomes in request order
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    /// Names that were imported
    pub fn imported(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.name.as_str())
            .collect()
    }

    /// Failures, as recorded in the engine's last errors
    pub fn errors(&self) -> Vec<ImportError> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.result {
                Ok(()) => None,
                Err(error) => Some(ImportError {
                    name: o.name.clone(),
                    error: error.clone(),
                }),
            })
            .collect()
    }

    /// Whether every name was imported
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Turn any failure into `ImportPartialFailure`
    pub fn into_result(self) -> MetaResult<()> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MetaError::ImportPartialFailure(errors))
        }
    }
}

impl Engine {
    /// Copy methods from `source` into `dest`, replacing existing ones
    ///
    /// Names missing from `source` are reported per name and do not stop
    /// the batch. The failures also replace the engine's last errors.
    /// The effective callable is copied, so advice on the source method
    /// travels with it; the destination entry itself starts without advice.
    pub fn import_methods(&self, source: &str, dest: &str, names: &[&str]) -> MetaResult<ImportReport> {
        let source_ref = self.class(source)?;
        self.class(dest)?;

        let mut report = ImportReport::default();
        for &name in names {
            let callable = source_ref
                .read()
                .methods
                .get(name)
                .map(|e| e.callable().clone());
            let result = match callable {
                Some(body) => self.install_entry(dest, MethodEntry::new(name, MethodKind::Imported, body)),
                None => Err(MetaError::method_not_found(source, name)),
            };
            if let Err(error) = &result {
                log::debug!("[Engine::import_methods] {} -> {}: {}", source, dest, error);
            }
            report.outcomes.push(ImportOutcome {
                name: name.to_string(),
                result,
            });
        }

        *self.last_errors.lock() = report.errors();
        Ok(report)
    }
}

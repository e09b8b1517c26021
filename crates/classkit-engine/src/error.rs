//! Engine error types

use std::fmt;

/// Errors raised by engine operations and by method bodies
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetaError {
    /// No class is registered under this name
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// The name is not a valid class identifier
    #[error("Invalid class name: {0:?}")]
    InvalidClassName(String),

    /// The name is not a valid method or attribute identifier
    #[error("Invalid method name: {0:?}")]
    InvalidMethodName(String),

    /// `add` refused to rebind an existing method
    #[error("Method '{method}' already exists in class {class}")]
    MethodAlreadyExists {
        /// Class being modified
        class: String,
        /// Method name
        method: String,
    },

    /// The method is not defined where it was looked up
    #[error("Method '{method}' not found in class {class}")]
    MethodNotFound {
        /// Class searched
        class: String,
        /// Method name
        method: String,
    },

    /// No ancestor of the class defines the method
    #[error("No super method '{method}' for class {class}")]
    NoSuperMethod {
        /// Class whose ancestors were searched
        class: String,
        /// Method name
        method: String,
    },

    /// Adding the parent would make the class its own ancestor
    #[error("Cyclic inheritance: {class} cannot extend {parent}")]
    CyclicInheritance {
        /// Class being extended
        class: String,
        /// Rejected parent
        parent: String,
    },

    /// A read-only accessor was called with a value
    #[error("Attribute '{attribute}' of class {class} is read-only")]
    ReadOnlyAttribute {
        /// Class of the receiver
        class: String,
        /// Attribute name
        attribute: String,
    },

    /// Some names of an import batch failed; the others are installed
    #[error("Import failed for {} method(s)", .0.len())]
    ImportPartialFailure(Vec<ImportError>),

    /// Malformed accessor or engine option
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A value had the wrong shape for the operation
    #[error("Type error: {0}")]
    TypeError(String),

    /// Failure raised by a method body
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl MetaError {
    /// Shorthand for a method body failure
    pub fn runtime(message: impl Into<String>) -> Self {
        MetaError::RuntimeError(message.into())
    }

    pub(crate) fn method_not_found(class: &str, method: &str) -> Self {
        MetaError::MethodNotFound {
            class: class.to_string(),
            method: method.to_string(),
        }
    }
}

/// Per-name failure collected by a method import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    /// Method name that could not be imported
    pub name: String,
    /// Why it failed
    pub error: MetaError,
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}

/// Engine operation result
pub type MetaResult<T> = Result<T, MetaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MetaError::MethodAlreadyExists {
            class: "Point".to_string(),
            method: "x".to_string(),
        };
        assert_eq!(err.to_string(), "Method 'x' already exists in class Point");

        let err = MetaError::ClassNotFound("Missing".to_string());
        assert_eq!(err.to_string(), "Class not found: Missing");
    }

    #[test]
    fn test_partial_failure_counts_names() {
        let err = MetaError::ImportPartialFailure(vec![
            ImportError {
                name: "a".to_string(),
                error: MetaError::method_not_found("Src", "a"),
            },
            ImportError {
                name: "b".to_string(),
                error: MetaError::method_not_found("Src", "b"),
            },
        ]);
        assert_eq!(err.to_string(), "Import failed for 2 method(s)");
        if let MetaError::ImportPartialFailure(errors) = &err {
            assert_eq!(errors[1].to_string(), "b: Method 'b' not found in class Src");
        }
    }
}

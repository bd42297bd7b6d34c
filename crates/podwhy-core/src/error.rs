// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for podwhy operations
#[derive(Error, Debug, Diagnostic)]
pub enum CoreError {
    /// Object is missing a field the snapshot cannot do without
    #[error("Invalid {kind}: {reason}")]
    #[diagnostic(
        code(podwhy::invalid_object),
        help("Every pod and node in a snapshot needs at least metadata.name")
    )]
    InvalidObject {
        #[allow(unused)]
        kind: String,
        #[allow(unused)]
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(podwhy::serialization_error),
        help("Ensure the document is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an InvalidObject error
    pub fn invalid_object(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidObject {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }
}

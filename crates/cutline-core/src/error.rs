//! Error types for Cutline.

use thiserror::Error;

/// Main error type for Cutline operations.
///
/// `Clone` so registry failures can be kept as inspectable state while the
/// same error is handed back to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutlineError {
    /// Malformed mutation input (bad timing, locked layer, bad settings).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An id absent from the relevant mapping.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The external engine failed or is unreachable.
    #[error("Engine error: {0}")]
    Engine(String),

    /// Another operation on the same project id is still in flight.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CutlineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl CutlineError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand for a missing id.
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} '{id}'"))
    }
}

/// Result type alias for Cutline operations.
pub type Result<T> = std::result::Result<T, CutlineError>;

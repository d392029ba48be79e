//! Error types for Closet.

use thiserror::Error;

/// Top-level result type for Closet operations.
pub type Result<T> = std::result::Result<T, ClosetError>;

/// Top-level error type for Closet.
#[derive(Debug, Error)]
pub enum ClosetError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ClosetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Errors raised when a draft is not fit to become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("REJECTED: Title is required.")]
    MissingTitle,

    #[error("REJECTED: At least one image is required.")]
    MissingImage,

    #[error("unknown season '{0}': expected Spring, Summer, Autumn, Winter or All")]
    UnknownSeason(String),

    #[error("unknown provider '{0}': expected gemini or openai")]
    UnknownProvider(String),
}

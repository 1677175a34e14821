//! Error types for tagform-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tagform-core and the adapters built on it
#[derive(Debug, Error)]
pub enum Error {
    /// A tag with this name is already in the catalog
    #[error("Tag already exists: {0}")]
    DuplicateTag(String),

    /// Operator symbol outside `+ - * / ^ ( )`
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Reading or writing persisted state failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Persisted state could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

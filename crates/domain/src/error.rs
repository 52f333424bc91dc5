//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while describing interceptions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An interception path must start with `/`.
    #[error("invalid interception path: {0}")]
    InvalidPath(String),

    /// A header name is empty or contains whitespace.
    #[error("invalid header name: {0:?}")]
    InvalidHeaderName(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

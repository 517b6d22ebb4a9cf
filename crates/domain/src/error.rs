//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A resource identifier is zero or negative.
    #[error("invalid resource identifier: {0} (must be > 0)")]
    InvalidIdentifier(i64),

    /// The base URL is invalid or malformed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A request path cannot be resolved against the base URL.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// The HTTP method is not part of the contract.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Harness settings are out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A scenario or fixture is structurally invalid.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

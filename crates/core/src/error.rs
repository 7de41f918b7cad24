//! Shared error model for domain primitives.

use thiserror::Error;

/// Result type used by the core primitives.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by the core primitives themselves.
///
/// Keep this focused on deterministic failures (parsing, validation of
/// primitive values). Business rules live in the ledger crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

//! Ledger error model.

use thiserror::Error;

use crate::region::Region;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every writer failure aborts the surrounding transaction with zero side
/// effects; the variants here are what the application layer branches on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (e.g. zero amount, malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A removal asked for more bags than the region holds.
    #[error("insufficient stock in {region}: requested {requested}, available {available}")]
    InsufficientStock {
        region: Region,
        requested: u64,
        available: u64,
    },

    /// `initialize` was called for a region that already has a record.
    /// Use `set_absolute_level` to reconcile an existing region instead.
    #[error("inventory for {0} is already initialized")]
    AlreadyInitialized(Region),

    /// The commit retry budget was exhausted under write contention.
    /// The whole operation can safely be retried by the caller.
    #[error("write conflict on {region} after {attempts} attempts")]
    Conflict { region: Region, attempts: u32 },

    /// The backing store failed for non-business reasons.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

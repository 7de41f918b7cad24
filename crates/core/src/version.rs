//! Optimistic concurrency expectations.

use crate::error::{CoreError, CoreResult};

/// Version expectation for an optimistic read-modify-write cycle.
///
/// Version 0 means "no committed state yet"; each successful commit for a
/// record bumps its version by one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent maintenance paths).
    Any,
    /// Require the record to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> CoreResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(CoreError::validation(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

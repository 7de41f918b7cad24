use std::sync::Arc;

use thiserror::Error;

use bagstock_core::ExpectedVersion;
use bagstock_ledger::{InventoryRecord, LedgerEntry, Region};

/// An inventory record together with its commit version.
///
/// Version 0 means "no committed record"; every successful commit for a
/// region bumps the version by one. The version is the optimistic read set:
/// a commit is only accepted if the region is still at the version the
/// caller read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    pub version: u64,
    pub record: InventoryRecord,
}

/// Store operation error.
///
/// These are infrastructure errors (concurrency, invalid commits, backend
/// failures), as opposed to the domain errors in `bagstock-ledger`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("invalid commit: {0}")]
    InvalidCommit(String),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Backing store for the ledger: one versioned record per region plus an
/// append-only entry log.
///
/// ## Commit semantics
///
/// `commit()` is the transaction boundary. Implementations must apply the
/// version check, the record upsert, and the entry append as one atomic
/// unit: concurrent readers observe all of it or none of it. Entries are
/// never updated or deleted.
///
/// ## Read semantics
///
/// The listing methods return snapshots with **no ordering guarantee**;
/// entry order in particular may reflect insertion order rather than
/// `created_at` order (backdated entries break the correspondence). The
/// reader re-sorts.
pub trait LedgerStore: Send + Sync {
    /// Load the current record and version for a region, if any.
    fn load(&self, region: Region) -> Result<Option<VersionedRecord>, StoreError>;

    /// Atomically upsert the record and append the entry (when present),
    /// provided the region is still at `expected` version.
    ///
    /// Returns the new version on success.
    fn commit(
        &self,
        region: Region,
        expected: ExpectedVersion,
        record: InventoryRecord,
        entry: Option<LedgerEntry>,
    ) -> Result<u64, StoreError>;

    /// Snapshot of all records (unordered).
    fn list_records(&self) -> Result<Vec<InventoryRecord>, StoreError>;

    /// Snapshot of all entries (insertion order, not query order).
    fn list_entries(&self) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Snapshot of one region's entries (insertion order, not query order).
    fn list_entries_for_region(&self, region: Region) -> Result<Vec<LedgerEntry>, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load(&self, region: Region) -> Result<Option<VersionedRecord>, StoreError> {
        (**self).load(region)
    }

    fn commit(
        &self,
        region: Region,
        expected: ExpectedVersion,
        record: InventoryRecord,
        entry: Option<LedgerEntry>,
    ) -> Result<u64, StoreError> {
        (**self).commit(region, expected, record, entry)
    }

    fn list_records(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        (**self).list_records()
    }

    fn list_entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).list_entries()
    }

    fn list_entries_for_region(&self, region: Region) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).list_entries_for_region(region)
    }
}

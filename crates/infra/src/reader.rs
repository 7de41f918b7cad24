//! Read-only views over inventory records and ledger entries.
//!
//! Entry `created_at` may be caller-supplied (backdated corrections), so
//! store insertion order is not chronological order. Every entry query here
//! re-sorts in memory to guarantee strict descending chronological order
//! regardless of the backing store's own ordering.

use chrono::{Duration, Utc};

use bagstock_ledger::{InventoryRecord, LedgerEntry, LedgerError, LedgerResult, Region};

use crate::store::LedgerStore;

/// Read-only query surface consumed by the presentation layer.
///
/// Queries have no transactional semantics and may return a slightly stale
/// snapshot under concurrent writes. Callers needing one consistent total
/// should derive it from a single `list_all_inventory()` result.
#[derive(Debug)]
pub struct LedgerReader<S> {
    store: S,
}

impl<S> LedgerReader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> LedgerReader<S>
where
    S: LedgerStore,
{
    /// All inventory records, ordered by region name ascending.
    pub fn list_all_inventory(&self) -> LedgerResult<Vec<InventoryRecord>> {
        let mut records = self
            .store
            .list_records()
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        records.sort_by_key(|r| r.region);
        Ok(records)
    }

    /// All ledger entries, strictly `created_at` descending.
    pub fn list_all_entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        let entries = self
            .store
            .list_entries()
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(sorted_descending(entries))
    }

    /// One region's entries, strictly `created_at` descending.
    pub fn list_entries_for_region(&self, region: Region) -> LedgerResult<Vec<LedgerEntry>> {
        let entries = self
            .store
            .list_entries_for_region(region)
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(sorted_descending(entries))
    }

    /// Entries whose `created_at` falls within the trailing `window`.
    pub fn list_recent_entries(&self, window: Duration) -> LedgerResult<Vec<LedgerEntry>> {
        let cutoff = Utc::now() - window;
        let mut entries = self.list_all_entries()?;
        entries.retain(|e| e.created_at >= cutoff);
        Ok(entries)
    }
}

/// Sort newest-first. Entry ids (UUIDv7, time-ordered at write) break ties
/// between equal timestamps so the order is total and deterministic.
fn sorted_descending(mut entries: Vec<LedgerEntry>) -> Vec<LedgerEntry> {
    entries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(b.entry_id.cmp(&a.entry_id))
    });
    entries
}

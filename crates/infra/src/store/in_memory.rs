use std::collections::HashMap;
use std::sync::RwLock;

use bagstock_core::ExpectedVersion;
use bagstock_ledger::{InventoryRecord, LedgerEntry, Region};

use super::r#trait::{LedgerStore, StoreError, VersionedRecord};

#[derive(Debug)]
struct Inner {
    records: HashMap<Region, VersionedRecord>,
    entries: Vec<LedgerEntry>,
}

/// In-memory ledger store.
///
/// Intended for tests/dev. One lock guards both collections, which is what
/// makes the record upsert and the entry append a single atomic unit.
#[derive(Debug)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                entries: Vec::new(),
            }),
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load(&self, region: Region) -> Result<Option<VersionedRecord>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.records.get(&region).cloned())
    }

    fn commit(
        &self,
        region: Region,
        expected: ExpectedVersion,
        record: InventoryRecord,
        entry: Option<LedgerEntry>,
    ) -> Result<u64, StoreError> {
        if record.region != region {
            return Err(StoreError::InvalidCommit(format!(
                "record region '{}' does not match commit region '{region}'",
                record.region
            )));
        }
        if let Some(e) = &entry {
            if e.region != region {
                return Err(StoreError::InvalidCommit(format!(
                    "entry region '{}' does not match commit region '{region}'",
                    e.region
                )));
            }
            if e.bags_changed == 0 {
                return Err(StoreError::InvalidCommit(
                    "entry must carry a non-zero delta".to_string(),
                ));
            }
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let current = inner.records.get(&region).map(|v| v.version).unwrap_or(0);
        if !expected.matches(current) {
            return Err(StoreError::Concurrency(format!(
                "region {region}: expected {expected:?}, found {current}"
            )));
        }

        let version = current + 1;
        inner
            .records
            .insert(region, VersionedRecord { version, record });
        if let Some(e) = entry {
            inner.entries.push(e);
        }

        Ok(version)
    }

    fn list_records(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.records.values().map(|v| v.record.clone()).collect())
    }

    fn list_entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner.entries.clone())
    }

    fn list_entries_for_region(&self, region: Region) -> Result<Vec<LedgerEntry>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.region == region)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bagstock_core::{Actor, UserId};
    use chrono::Utc;

    fn record(region: Region, total: u64) -> InventoryRecord {
        InventoryRecord::new(region, total, &Actor::new(UserId::new(), "t"), Utc::now())
    }

    #[test]
    fn commit_bumps_version_and_checks_expectation() {
        let store = InMemoryLedgerStore::new();

        let v1 = store
            .commit(Region::North, ExpectedVersion::Exact(0), record(Region::North, 5), None)
            .unwrap();
        assert_eq!(v1, 1);

        // Stale expectation is rejected without touching state.
        let err = store
            .commit(Region::North, ExpectedVersion::Exact(0), record(Region::North, 9), None)
            .unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));
        assert_eq!(store.load(Region::North).unwrap().unwrap().record.total_bags, 5);

        let v2 = store
            .commit(Region::North, ExpectedVersion::Exact(1), record(Region::North, 9), None)
            .unwrap();
        assert_eq!(v2, 2);
    }

    #[test]
    fn regions_version_independently() {
        let store = InMemoryLedgerStore::new();
        store
            .commit(Region::North, ExpectedVersion::Exact(0), record(Region::North, 1), None)
            .unwrap();
        // A commit to another region still starts at version 0.
        store
            .commit(Region::South, ExpectedVersion::Exact(0), record(Region::South, 2), None)
            .unwrap();
    }

    #[test]
    fn mismatched_regions_are_rejected() {
        let store = InMemoryLedgerStore::new();
        let err = store
            .commit(Region::North, ExpectedVersion::Exact(0), record(Region::South, 1), None)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCommit(_)));
    }
}

//! Integration tests for the full ledger pipeline.
//!
//! Tests: Writer → LedgerStore → Reader → derived statistics.
//!
//! Verifies:
//! - the record stays a fold of its entries across mixed operations
//! - rejected operations leave the store untouched
//! - reader ordering survives backdated timestamps
//! - concurrent writers on one region lose no updates

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};

    use bagstock_core::{Actor, ExpectedVersion, TimestampInput, UserId};
    use bagstock_ledger::{
        ChangeType, InventoryRecord, LedgerEntry, LedgerError, Region, CORRECTION_PROVENANCE,
        INITIAL_SOURCE,
    };

    use crate::reader::LedgerReader;
    use crate::stats;
    use crate::store::{InMemoryLedgerStore, LedgerStore, StoreError, VersionedRecord};
    use crate::writer::LedgerWriter;

    fn test_actor(name: &str) -> Actor {
        Actor::new(UserId::new(), name)
    }

    fn setup() -> (
        Arc<InMemoryLedgerStore>,
        LedgerWriter<Arc<InMemoryLedgerStore>>,
        LedgerReader<Arc<InMemoryLedgerStore>>,
    ) {
        bagstock_observability::init();
        let store = Arc::new(InMemoryLedgerStore::new());
        let writer = LedgerWriter::new(store.clone());
        let reader = LedgerReader::new(store.clone());
        (store, writer, reader)
    }

    #[test]
    fn end_to_end_walkthrough() {
        let (_store, writer, reader) = setup();
        let actor_a = test_actor("ana");
        let actor_b = test_actor("bo");
        let region = Region::North;

        // Seed count.
        let record = writer.initialize(region, 500, &actor_a).unwrap();
        assert_eq!(record.total_bags, 500);
        let entries = reader.list_entries_for_region(region).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].change_type, ChangeType::Addition);
        assert_eq!(entries[0].bags_changed, 500);
        assert_eq!(entries[0].source.as_deref(), Some(INITIAL_SOURCE));

        // Delivery arrives.
        let record = writer
            .add(region, 200, "Supplier X", None, &actor_b, None)
            .unwrap();
        assert_eq!(record.total_bags, 700);
        assert_eq!(reader.list_entries_for_region(region).unwrap().len(), 2);

        // Over-removal is rejected and changes nothing.
        let err = writer
            .remove(region, 900, "Store Y", None, &actor_a, None)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                region,
                requested: 900,
                available: 700,
            }
        );
        assert_eq!(
            reader.list_all_inventory().unwrap()[0].total_bags,
            700,
            "failed removal must not change the balance"
        );

        // Manual count disagrees; reconcile downward.
        let record = writer
            .set_absolute_level(region, 650, &actor_a, None)
            .unwrap();
        assert_eq!(record.total_bags, 650);

        let entries = reader.list_entries_for_region(region).unwrap();
        assert_eq!(entries.len(), 3);
        let correction = &entries[0];
        assert_eq!(correction.change_type, ChangeType::Removal);
        assert_eq!(correction.bags_changed, -50);
        assert_eq!(
            correction.destination.as_deref(),
            Some(CORRECTION_PROVENANCE)
        );
        assert_eq!(
            correction.notes.as_deref(),
            Some("Inventory corrected from 700 to 650")
        );

        // The record stays a fold of its ledger.
        let fold: i64 = entries.iter().map(|e| e.bags_changed).sum();
        assert_eq!(fold, 650);
    }

    #[test]
    fn rejected_removal_leaves_store_untouched() {
        let (store, writer, _reader) = setup();
        let actor = test_actor("ana");
        writer.initialize(Region::East, 10, &actor).unwrap();

        let records_before = store.list_records().unwrap();
        let entries_before = store.list_entries().unwrap();
        let version_before = store.load(Region::East).unwrap().unwrap().version;

        let err = writer
            .remove(Region::East, 11, "Store Y", None, &actor, None)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));

        assert_eq!(store.list_records().unwrap(), records_before);
        assert_eq!(store.list_entries().unwrap(), entries_before);
        assert_eq!(
            store.load(Region::East).unwrap().unwrap().version,
            version_before
        );
    }

    #[test]
    fn noop_correction_refreshes_metadata_without_entry() {
        let (_store, writer, reader) = setup();
        let ana = test_actor("ana");
        let carol = test_actor("carol");
        writer.initialize(Region::West, 40, &ana).unwrap();
        let before = reader.list_all_inventory().unwrap()[0].clone();

        let record = writer
            .set_absolute_level(Region::West, 40, &carol, None)
            .unwrap();

        assert_eq!(record.total_bags, 40);
        assert_eq!(record.updated_by, carol.id);
        assert_eq!(record.updated_by_name, "carol");
        assert!(record.last_updated >= before.last_updated);
        assert_eq!(
            reader.list_entries_for_region(Region::West).unwrap().len(),
            1,
            "no-op correction must not append an entry"
        );
    }

    #[test]
    fn double_initialize_is_rejected() {
        let (_store, writer, _reader) = setup();
        let actor = test_actor("ana");
        writer.initialize(Region::South, 5, &actor).unwrap();
        let err = writer.initialize(Region::South, 9, &actor).unwrap_err();
        assert_eq!(err, LedgerError::AlreadyInitialized(Region::South));
    }

    #[test]
    fn removal_against_uninitialized_region_sees_zero_balance() {
        let (_store, writer, _reader) = setup();
        let err = writer
            .remove(Region::Central, 1, "Store Y", None, &test_actor("ana"), None)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                region: Region::Central,
                requested: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn set_level_creates_record_for_uninitialized_region() {
        let (_store, writer, reader) = setup();
        let record = writer
            .set_absolute_level(Region::Central, 30, &test_actor("ana"), None)
            .unwrap();
        assert_eq!(record.total_bags, 30);

        let entries = reader.list_entries_for_region(Region::Central).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].bags_changed, 30);
        assert_eq!(entries[0].source.as_deref(), Some(CORRECTION_PROVENANCE));
    }

    #[test]
    fn backdated_entries_are_returned_in_chronological_order() {
        let (_store, writer, reader) = setup();
        let actor = test_actor("ana");
        let region = Region::Central;
        writer.initialize(region, 100, &actor).unwrap();

        // Written after the initialize, but dated well before it.
        let long_ago = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        writer
            .add(
                region,
                10,
                "Supplier X",
                None,
                &actor,
                Some(TimestampInput::DateTime(long_ago)),
            )
            .unwrap();
        writer
            .add(region, 20, "Supplier X", None, &actor, None)
            .unwrap();

        let entries = reader.list_all_entries().unwrap();
        assert_eq!(entries.len(), 3);
        for pair in entries.windows(2) {
            assert!(
                pair[0].created_at >= pair[1].created_at,
                "entries must be created_at descending"
            );
        }
        // The backdated entry sorts last despite being written second.
        assert_eq!(entries[2].created_at, long_ago);
        assert_eq!(entries[2].bags_changed, 10);
    }

    #[test]
    fn iso_string_timestamps_are_normalized() {
        let (_store, writer, reader) = setup();
        let actor = test_actor("ana");
        writer.initialize(Region::North, 1, &actor).unwrap();
        writer
            .add(
                Region::North,
                5,
                "Supplier X",
                None,
                &actor,
                Some(TimestampInput::Iso8601(
                    "2021-06-01T12:00:00+02:00".to_string(),
                )),
            )
            .unwrap();

        let entries = reader.list_entries_for_region(Region::North).unwrap();
        let expected = Utc.with_ymd_and_hms(2021, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(entries.last().unwrap().created_at, expected);
    }

    #[test]
    fn recent_entries_respect_the_window() {
        let (_store, writer, reader) = setup();
        let actor = test_actor("ana");
        let region = Region::East;
        writer.initialize(region, 100, &actor).unwrap();
        writer
            .add(
                region,
                10,
                "Supplier X",
                None,
                &actor,
                Some(TimestampInput::DateTime(Utc::now() - Duration::days(3))),
            )
            .unwrap();

        let recent = reader.list_recent_entries(Duration::days(1)).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].bags_changed, 100);
    }

    #[test]
    fn regions_are_independent() {
        let (_store, writer, reader) = setup();
        let actor = test_actor("ana");
        writer.initialize(Region::North, 10, &actor).unwrap();
        writer.initialize(Region::South, 20, &actor).unwrap();
        writer
            .remove(Region::South, 5, "Store Y", None, &actor, None)
            .unwrap();

        let records = reader.list_all_inventory().unwrap();
        // Ascending by region name: north before south.
        assert_eq!(records[0].region, Region::North);
        assert_eq!(records[0].total_bags, 10);
        assert_eq!(records[1].region, Region::South);
        assert_eq!(records[1].total_bags, 15);

        assert_eq!(stats::total_stock(&records), 25);
        assert_eq!(
            reader.list_entries_for_region(Region::North).unwrap().len(),
            1
        );
    }

    #[test]
    fn concurrent_adds_lose_no_updates() {
        let (store, writer, reader) = setup();
        let actor = test_actor("ana");
        let region = Region::North;
        writer.initialize(region, 0, &actor).unwrap();

        let writer = Arc::new(writer);
        let n = 8;
        let mut handles = Vec::with_capacity(n);
        for i in 0..n {
            let writer = writer.clone();
            let actor = test_actor(&format!("worker-{i}"));
            handles.push(std::thread::spawn(move || {
                writer
                    .add(region, 1, "Supplier X", None, &actor, None)
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let record = store.load(region).unwrap().unwrap();
        assert_eq!(record.record.total_bags, n as u64);
        assert_eq!(reader.list_entries_for_region(region).unwrap().len(), n);
    }

    /// Store wrapper that reports synthetic contention on every commit.
    struct ContendedStore {
        inner: InMemoryLedgerStore,
        commits: std::sync::atomic::AtomicU32,
    }

    impl ContendedStore {
        fn new() -> Self {
            Self {
                inner: InMemoryLedgerStore::new(),
                commits: std::sync::atomic::AtomicU32::new(0),
            }
        }
    }

    impl LedgerStore for ContendedStore {
        fn load(&self, region: Region) -> Result<Option<VersionedRecord>, StoreError> {
            self.inner.load(region)
        }

        fn commit(
            &self,
            _region: Region,
            _expected: ExpectedVersion,
            _record: InventoryRecord,
            _entry: Option<LedgerEntry>,
        ) -> Result<u64, StoreError> {
            self.commits
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(StoreError::Concurrency("synthetic contention".to_string()))
        }

        fn list_records(&self) -> Result<Vec<InventoryRecord>, StoreError> {
            self.inner.list_records()
        }

        fn list_entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
            self.inner.list_entries()
        }

        fn list_entries_for_region(
            &self,
            region: Region,
        ) -> Result<Vec<LedgerEntry>, StoreError> {
            self.inner.list_entries_for_region(region)
        }
    }

    #[test]
    fn exhausted_retry_budget_surfaces_conflict() {
        let store = Arc::new(ContendedStore::new());
        let writer = LedgerWriter::new(store.clone());
        let err = writer
            .add(Region::West, 1, "Supplier X", None, &test_actor("ana"), None)
            .unwrap_err();
        match err {
            LedgerError::Conflict { region, attempts } => {
                assert_eq!(region, Region::West);
                // The budget is spent exactly: one commit per attempt, no
                // extra cycles after the reported count.
                assert_eq!(
                    store.commits.load(std::sync::atomic::Ordering::SeqCst),
                    attempts
                );
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }
}

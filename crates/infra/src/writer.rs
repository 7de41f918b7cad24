//! Transactional ledger writer (the sole mutator).
//!
//! The writer runs every operation as an optimistic read-plan-commit cycle
//! against the backing store:
//!
//! ```text
//! Operation
//!   ↓
//! 1. Load the region's versioned record (absent ⇒ Uninitialized)
//!   ↓
//! 2. Plan (pure domain logic in `bagstock_ledger::ops`)
//!   ↓
//! 3. Commit record + entry under the loaded version
//!   ↓
//! 4. On a version conflict, back off and retry the whole cycle
//! ```
//!
//! Business failures (insufficient stock, double initialize, bad input)
//! abort before the commit, so they never write anything. A conflict means
//! another writer committed the same region first; the cycle is retried
//! from the load step a bounded number of times, then surfaced as
//! [`LedgerError::Conflict`] for the caller to retry at its level.

use std::time::Duration;

use chrono::{DateTime, Utc};

use bagstock_core::{Actor, ExpectedVersion, TimestampInput};
use bagstock_ledger::{
    BalanceState, InventoryRecord, LedgerError, LedgerResult, MutationPlan, Region, ops,
};

use crate::store::{LedgerStore, StoreError};

/// How many times one operation may run its read-plan-commit cycle before
/// giving up with `Conflict`.
const MAX_COMMIT_ATTEMPTS: u32 = 16;

/// Base backoff between attempts; grows linearly with the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(2);

/// The only component allowed to mutate inventory records and append
/// ledger entries.
#[derive(Debug)]
pub struct LedgerWriter<S> {
    store: S,
}

impl<S> LedgerWriter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S> LedgerWriter<S>
where
    S: LedgerStore,
{
    /// Seed a region with its first counted balance.
    ///
    /// Fails with [`LedgerError::AlreadyInitialized`] if the region already
    /// has a record. Always stamped with commit time (there is nothing to
    /// backdate a first count against).
    pub fn initialize(
        &self,
        region: Region,
        initial_bags: u64,
        actor: &Actor,
    ) -> LedgerResult<InventoryRecord> {
        self.execute(region, None, |state, at| {
            ops::plan_initialize(state, region, initial_bags, actor, at)
        })
    }

    /// Add bags to a region, recording their source.
    pub fn add(
        &self,
        region: Region,
        amount: u64,
        source: &str,
        notes: Option<String>,
        actor: &Actor,
        occurred_at: Option<TimestampInput>,
    ) -> LedgerResult<InventoryRecord> {
        self.execute(region, occurred_at, |state, at| {
            ops::plan_add(state, region, amount, source, notes.clone(), actor, at)
        })
    }

    /// Remove bags from a region, recording their destination.
    ///
    /// Fails with [`LedgerError::InsufficientStock`] (and writes nothing)
    /// if the region holds fewer than `amount` bags.
    pub fn remove(
        &self,
        region: Region,
        amount: u64,
        destination: &str,
        notes: Option<String>,
        actor: &Actor,
        occurred_at: Option<TimestampInput>,
    ) -> LedgerResult<InventoryRecord> {
        self.execute(region, occurred_at, |state, at| {
            ops::plan_remove(state, region, amount, destination, notes.clone(), actor, at)
        })
    }

    /// Reconcile a region's balance to an externally observed count,
    /// recording the signed difference as a correction entry (or nothing,
    /// when the count already matches).
    pub fn set_absolute_level(
        &self,
        region: Region,
        new_total: u64,
        actor: &Actor,
        occurred_at: Option<TimestampInput>,
    ) -> LedgerResult<InventoryRecord> {
        self.execute(region, occurred_at, |state, at| {
            ops::plan_set_level(state, region, new_total, actor, at)
        })
    }

    /// Run one operation's read-plan-commit cycle with bounded retry.
    ///
    /// A caller-supplied timestamp is normalized once and used verbatim on
    /// every attempt; an omitted one resolves to commit time per attempt.
    fn execute(
        &self,
        region: Region,
        occurred_at: Option<TimestampInput>,
        plan: impl Fn(&BalanceState, DateTime<Utc>) -> LedgerResult<MutationPlan>,
    ) -> LedgerResult<InventoryRecord> {
        let pinned = occurred_at.map(TimestampInput::normalize);

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let loaded = self
                .store
                .load(region)
                .map_err(|e| LedgerError::storage(e.to_string()))?;

            let (state, expected) = match &loaded {
                Some(v) => (
                    BalanceState::Initialized {
                        balance: v.record.total_bags,
                    },
                    ExpectedVersion::Exact(v.version),
                ),
                None => (BalanceState::Uninitialized, ExpectedVersion::Exact(0)),
            };

            let at = pinned.unwrap_or_else(Utc::now);
            let MutationPlan { record, entry } = plan(&state, at)?;

            match self.store.commit(region, expected, record.clone(), entry) {
                Ok(version) => {
                    tracing::debug!(%region, version, attempt, "ledger commit");
                    return Ok(record);
                }
                Err(StoreError::Concurrency(msg)) => {
                    tracing::debug!(%region, attempt, %msg, "commit conflict, retrying");
                    // No point backing off once the budget is spent.
                    if attempt < MAX_COMMIT_ATTEMPTS {
                        std::thread::sleep(RETRY_BACKOFF * attempt);
                    }
                }
                Err(e) => return Err(LedgerError::storage(e.to_string())),
            }
        }

        Err(LedgerError::Conflict {
            region,
            attempts: MAX_COMMIT_ATTEMPTS,
        })
    }
}

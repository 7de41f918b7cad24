//! Pure decision logic for the five writer operations.
//!
//! Each `plan_*` function maps the region's current [`BalanceState`] plus the
//! caller's inputs to a [`MutationPlan`]: the updated record and the entry to
//! append, or a domain error. No IO happens here; the infra writer executes
//! the plan inside a store transaction and retries it on write conflicts.

use chrono::{DateTime, Utc};

use bagstock_core::{Actor, EntryId};

use crate::error::{LedgerError, LedgerResult};
use crate::model::{BalanceState, ChangeType, InventoryRecord, LedgerEntry};
use crate::region::Region;

/// Provenance recorded on the entry created by `initialize`.
pub const INITIAL_SOURCE: &str = "Initial Inventory";

/// Provenance recorded on entries created by `set_absolute_level`.
pub const CORRECTION_PROVENANCE: &str = "Inventory Correction";

/// The outcome of a planned mutation: the record to upsert and, when the
/// operation produced a non-zero delta, the entry to append alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationPlan {
    pub record: InventoryRecord,
    pub entry: Option<LedgerEntry>,
}

/// Seed a region's record with its first counted balance.
///
/// Fails with [`LedgerError::AlreadyInitialized`] if the region already has a
/// record; reconciling an existing region is `set_absolute_level`'s job.
/// A zero seed writes the record but no entry (entries always carry a
/// non-zero delta).
pub fn plan_initialize(
    state: &BalanceState,
    region: Region,
    initial_bags: u64,
    actor: &Actor,
    at: DateTime<Utc>,
) -> LedgerResult<MutationPlan> {
    if state.is_initialized() {
        return Err(LedgerError::AlreadyInitialized(region));
    }

    let delta = checked_delta(initial_bags)?;
    let entry = (delta > 0).then(|| {
        make_entry(
            region,
            ChangeType::Addition,
            delta,
            Some(INITIAL_SOURCE.to_string()),
            None,
            None,
            actor,
            at,
        )
    });

    Ok(MutationPlan {
        record: InventoryRecord::new(region, initial_bags, actor, at),
        entry,
    })
}

/// Add `amount` bags to the region, recording where they came from.
///
/// Never fails on business grounds beyond input validation: there is no
/// upper stock bound. An uninitialized region starts from zero.
pub fn plan_add(
    state: &BalanceState,
    region: Region,
    amount: u64,
    source: &str,
    notes: Option<String>,
    actor: &Actor,
    at: DateTime<Utc>,
) -> LedgerResult<MutationPlan> {
    let delta = positive_delta(amount)?;
    let new_balance = state
        .balance()
        .checked_add(amount)
        .ok_or_else(|| LedgerError::validation("stock balance overflow"))?;

    Ok(MutationPlan {
        record: InventoryRecord::new(region, new_balance, actor, at),
        entry: Some(make_entry(
            region,
            ChangeType::Addition,
            delta,
            Some(source.to_string()),
            None,
            notes,
            actor,
            at,
        )),
    })
}

/// Remove `amount` bags from the region, recording where they went.
///
/// Precondition: the region holds at least `amount` bags; otherwise fails
/// with [`LedgerError::InsufficientStock`] and nothing is written. An
/// uninitialized region holds zero, so any removal against it fails.
pub fn plan_remove(
    state: &BalanceState,
    region: Region,
    amount: u64,
    destination: &str,
    notes: Option<String>,
    actor: &Actor,
    at: DateTime<Utc>,
) -> LedgerResult<MutationPlan> {
    let delta = positive_delta(amount)?;
    let available = state.balance();
    if amount > available {
        return Err(LedgerError::InsufficientStock {
            region,
            requested: amount,
            available,
        });
    }

    Ok(MutationPlan {
        record: InventoryRecord::new(region, available - amount, actor, at),
        entry: Some(make_entry(
            region,
            ChangeType::Removal,
            -delta,
            None,
            Some(destination.to_string()),
            notes,
            actor,
            at,
        )),
    })
}

/// Reconcile the stored balance to an externally observed count.
///
/// Writes `new_total` and records the signed difference as a correction
/// entry. A zero delta still refreshes `last_updated`/`updated_by` but
/// appends nothing, so repeated reconciliation to the same count is
/// ledger-idempotent.
pub fn plan_set_level(
    state: &BalanceState,
    region: Region,
    new_total: u64,
    actor: &Actor,
    at: DateTime<Utc>,
) -> LedgerResult<MutationPlan> {
    let current = state.balance();
    let delta = checked_delta(new_total)? - checked_delta(current)?;

    let entry = (delta != 0).then(|| {
        let change_type = ChangeType::from_delta(delta);
        let provenance = Some(CORRECTION_PROVENANCE.to_string());
        let (source, destination) = match change_type {
            ChangeType::Addition => (provenance, None),
            ChangeType::Removal => (None, provenance),
        };
        make_entry(
            region,
            change_type,
            delta,
            source,
            destination,
            Some(format!("Inventory corrected from {current} to {new_total}")),
            actor,
            at,
        )
    });

    Ok(MutationPlan {
        record: InventoryRecord::new(region, new_total, actor, at),
        entry,
    })
}

fn positive_delta(amount: u64) -> LedgerResult<i64> {
    if amount == 0 {
        return Err(LedgerError::validation("amount must be positive"));
    }
    checked_delta(amount)
}

fn checked_delta(amount: u64) -> LedgerResult<i64> {
    i64::try_from(amount).map_err(|_| LedgerError::validation("amount too large"))
}

#[allow(clippy::too_many_arguments)]
fn make_entry(
    region: Region,
    change_type: ChangeType,
    bags_changed: i64,
    source: Option<String>,
    destination: Option<String>,
    notes: Option<String>,
    actor: &Actor,
    at: DateTime<Utc>,
) -> LedgerEntry {
    LedgerEntry {
        entry_id: EntryId::new(),
        region,
        change_type,
        bags_changed,
        source,
        destination,
        notes,
        created_at: at,
        recorded_by: actor.id,
        recorded_by_name: actor.name.clone(),
    }
}

//! Persisted ledger entities and the explicit balance state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bagstock_core::{Actor, EntryId, UserId};

use crate::region::Region;

/// Direction of a stock change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Addition,
    Removal,
}

impl ChangeType {
    /// Classify a non-zero signed delta.
    pub fn from_delta(delta: i64) -> Self {
        if delta > 0 {
            ChangeType::Addition
        } else {
            ChangeType::Removal
        }
    }
}

/// Current stock balance for one region (mutable, upserted).
///
/// Always a materialized fold of the region's ledger entries: after every
/// committed operation, `total_bags` equals the signed sum of `bags_changed`
/// over that region's entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub region: Region,
    pub total_bags: u64,
    pub last_updated: DateTime<Utc>,
    pub updated_by: UserId,
    pub updated_by_name: String,
}

impl InventoryRecord {
    pub fn new(region: Region, total_bags: u64, actor: &Actor, at: DateTime<Utc>) -> Self {
        Self {
            region,
            total_bags,
            last_updated: at,
            updated_by: actor.id,
            updated_by_name: actor.name.clone(),
        }
    }
}

/// One immutable stock change (never updated or deleted).
///
/// `bags_changed` is signed: positive for additions, negative for removals.
/// The actor name is denormalized so history reads correctly even after the
/// user record is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub region: Region,
    pub change_type: ChangeType,
    pub bags_changed: i64,
    /// Provenance for additions (where the bags came from).
    pub source: Option<String>,
    /// Provenance for removals (where the bags went).
    pub destination: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub recorded_by: UserId,
    pub recorded_by_name: String,
}

/// Whether a region has a committed inventory record yet.
///
/// Regions with no record are treated as balance zero by every operation
/// except `initialize`; this tagged variant keeps that policy explicit
/// instead of defaulting to zero at each call site.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BalanceState {
    Initialized { balance: u64 },
    Uninitialized,
}

impl BalanceState {
    pub fn balance(&self) -> u64 {
        match self {
            BalanceState::Initialized { balance } => *balance,
            BalanceState::Uninitialized => 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, BalanceState::Initialized { .. })
    }
}

//! Derived statistics over reader results.
//!
//! Nothing here is persisted or cached between calls: the presentation layer
//! recomputes these on demand from `list_all_inventory()` /
//! `list_all_entries()` snapshots.

use chrono::{DateTime, Duration};

use bagstock_ledger::{InventoryRecord, LedgerEntry};

/// Total bags held across all regions.
pub fn total_stock(records: &[InventoryRecord]) -> u64 {
    records.iter().map(|r| r.total_bags).sum()
}

/// Quantity added and removed over an entry set (both as magnitudes).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ChangeTotals {
    pub added: u64,
    pub removed: u64,
}

pub fn change_totals(entries: &[LedgerEntry]) -> ChangeTotals {
    let mut totals = ChangeTotals::default();
    for e in entries {
        if e.bags_changed > 0 {
            totals.added += e.bags_changed as u64;
        } else {
            totals.removed += e.bags_changed.unsigned_abs();
        }
    }
    totals
}

/// How many regions hold fewer than `threshold` bags.
pub fn low_stock_count(records: &[InventoryRecord], threshold: u64) -> usize {
    records.iter().filter(|r| r.total_bags < threshold).count()
}

/// How many entries fall within the trailing `window` ending at `now`.
pub fn recent_entry_count(
    entries: &[LedgerEntry],
    window: Duration,
    now: DateTime<chrono::Utc>,
) -> usize {
    let cutoff = now - window;
    entries.iter().filter(|e| e.created_at >= cutoff).count()
}

//! Infrastructure layer: store boundary, transactional writer, read views.

pub mod reader;
pub mod stats;
pub mod store;
pub mod writer;

#[cfg(test)]
mod integration_tests;

pub use reader::LedgerReader;
pub use stats::{change_totals, low_stock_count, recent_entry_count, total_stock, ChangeTotals};
pub use store::{InMemoryLedgerStore, LedgerStore, StoreError, VersionedRecord};
pub use writer::LedgerWriter;

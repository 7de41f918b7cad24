//! Backing store boundary for the ledger.
//!
//! This module defines the storage abstraction the writer transacts against
//! without making any storage assumptions: a versioned record per region
//! plus an append-only entry log, committed together atomically.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{LedgerStore, StoreError, VersionedRecord};

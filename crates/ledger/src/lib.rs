//! Regional bag inventory ledger (pure domain).
//!
//! This crate contains the business rules for the reusable-bag ledger,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Each writer operation is a pure *plan*: current balance state in,
//! updated record plus optional immutable ledger entry out. Persistence and
//! retry live in `bagstock-infra`.

pub mod error;
pub mod model;
pub mod ops;
pub mod region;

pub use error::{LedgerError, LedgerResult};
pub use model::{BalanceState, ChangeType, InventoryRecord, LedgerEntry};
pub use ops::{
    plan_add, plan_initialize, plan_remove, plan_set_level, MutationPlan, CORRECTION_PROVENANCE,
    INITIAL_SOURCE,
};
pub use region::Region;

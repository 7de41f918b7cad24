//! `bagstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod actor;
pub mod error;
pub mod id;
pub mod time;
pub mod version;

pub use actor::Actor;
pub use error::{CoreError, CoreResult};
pub use id::{EntryId, UserId};
pub use time::TimestampInput;
pub use version::ExpectedVersion;

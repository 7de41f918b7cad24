//! Actor identity passed in by the already-authenticated application layer.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Who performed a mutation.
///
/// The ledger does not authenticate; it records the `{id, name}` pair it is
/// handed. The name is denormalized onto every write so history survives
/// later renames or deletions of the user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
}

impl Actor {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

//! The fixed set of geographic regions tracked by the ledger.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One of the named geographic areas stock is tracked for.
///
/// The set is closed: regions are defined by configuration, never created or
/// destroyed at runtime. Variants are declared in alphabetical order so the
/// derived `Ord` matches "region name ascending", which is the listing order
/// the reader guarantees.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Central,
    East,
    North,
    South,
    West,
}

impl Region {
    /// All regions, in name order.
    pub const ALL: [Region; 5] = [
        Region::Central,
        Region::East,
        Region::North,
        Region::South,
        Region::West,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Central => "central",
            Region::East => "east",
            Region::North => "north",
            Region::South => "south",
            Region::West => "west",
        }
    }
}

impl core::fmt::Display for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "central" => Ok(Region::Central),
            "east" => Ok(Region::East),
            "north" => Ok(Region::North),
            "south" => Ok(Region::South),
            "west" => Ok(Region::West),
            other => Err(LedgerError::validation(format!("unknown region: {other}"))),
        }
    }
}

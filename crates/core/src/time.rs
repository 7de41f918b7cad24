//! Timestamp normalization shared by the ledger writer and reader.
//!
//! Callers hand timestamps to the ledger in whatever shape their layer
//! produces: a native `DateTime<Utc>`, a `{seconds, nanoseconds}` epoch pair
//! from a structured payload, or an ISO-8601 string. Everything is normalized
//! to `DateTime<Utc>` before it touches a record or an entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamp as supplied by a caller, before normalization.
///
/// The serde representation is untagged so JSON payloads carrying any of the
/// three shapes deserialize directly. A well-formed RFC 3339 string matches
/// the `DateTime` variant; anything else that is a string lands in `Iso8601`
/// and is parsed (or rejected) by [`TimestampInput::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampInput {
    /// Already-canonical value.
    DateTime(DateTime<Utc>),
    /// Structured epoch pair (e.g. from a document-store timestamp field).
    Epoch { seconds: i64, nanoseconds: u32 },
    /// ISO-8601 / RFC 3339 string.
    Iso8601(String),
}

impl TimestampInput {
    /// Produce the canonical `DateTime<Utc>`.
    ///
    /// Unparseable input logs a warning and falls back to "now" rather than
    /// failing the surrounding operation. This leniency is deliberate: a bad
    /// backdate must not block a stock mutation.
    pub fn normalize(self) -> DateTime<Utc> {
        match self {
            TimestampInput::DateTime(dt) => dt,
            TimestampInput::Epoch {
                seconds,
                nanoseconds,
            } => match DateTime::from_timestamp(seconds, nanoseconds) {
                Some(dt) => dt,
                None => {
                    tracing::warn!(seconds, nanoseconds, "out-of-range epoch timestamp, using now");
                    Utc::now()
                }
            },
            TimestampInput::Iso8601(raw) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(dt) => dt.with_timezone(&Utc),
                Err(e) => {
                    tracing::warn!(raw = %raw, error = %e, "unparseable timestamp string, using now");
                    Utc::now()
                }
            },
        }
    }

    /// Normalize an optional caller-supplied timestamp, defaulting to now.
    pub fn normalize_or_now(input: Option<TimestampInput>) -> DateTime<Utc> {
        input.map(TimestampInput::normalize).unwrap_or_else(Utc::now)
    }
}

impl From<DateTime<Utc>> for TimestampInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimestampInput::DateTime(value)
    }
}

//! Shared types for Roost

pub mod error;

pub use error::{Result, RoostError};

use chrono::{SecondsFormat, Utc};

/// Current time as a fixed-width ISO-8601 string (UTC, millisecond precision)
///
/// Fixed width keeps lexicographic order equal to chronological order, so
/// string dates sort correctly in both storage backends.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

//! Common types used across the platform

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a stored or submitted enum value is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Date range for queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
}

impl DateRange {
    /// The UTC calendar day containing `instant`, as a half-open range
    pub fn day_of(instant: chrono::DateTime<chrono::Utc>) -> Self {
        let start = instant
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(instant);
        Self {
            start,
            end: start + chrono::Duration::days(1),
        }
    }

    pub fn contains(&self, instant: &chrono::DateTime<chrono::Utc>) -> bool {
        *instant >= self.start && *instant < self.end
    }
}

//! Current date-time in the cellar's configured time zone.
//!
//! Ledger dates default to "today" where the household lives, not UTC, so
//! the clock carries a fixed UTC offset. Behind a trait so tests can pin
//! the date.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Ledger date format: `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current date-time, offset-adjusted.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Today's date as `YYYY-MM-DD` in the configured zone.
    fn today(&self) -> String {
        self.now().format(DATE_FORMAT).to_string()
    }
}

/// Wall clock with a configured fixed UTC offset.
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn utc() -> Self {
        SystemClock { offset: Utc.fix() }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        SystemClock { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Clock pinned to one instant, for tests and reproducible demos.
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn at(instant: DateTime<FixedOffset>) -> Self {
        FixedClock { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}

/// Shape-only `YYYY-MM-DD` check for supplied transaction dates. No
/// calendar validation.
pub fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|&i| b[i].is_ascii_digit())
}

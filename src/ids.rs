//! Identifier generation for wines and transactions.
//!
//! Ids are a timestamp plus a random suffix: `W-20240506-193012-4F7A2C`.
//! The timestamp makes them lexically sortable by generation time (handy
//! when eyeballing the ledger), the suffix makes collisions within one
//! second vanishingly unlikely. No global monotonicity is promised.

use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

const SUFFIX_LEN: usize = 6;

/// Fresh wine identifier.
pub fn wine_id(now: DateTime<FixedOffset>) -> String {
    stamped("W", now)
}

/// Fresh transaction identifier.
pub fn transaction_id(now: DateTime<FixedOffset>) -> String {
    stamped("TX", now)
}

fn stamped(prefix: &str, now: DateTime<FixedOffset>) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        now.format("%Y%m%d-%H%M%S"),
        random_suffix()
    )
}

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..SUFFIX_LEN].to_uppercase()
}

//! Transaction builders for tests
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for the CLI and server test suites.

use chrono::NaiveDateTime;

use crate::models::{datetime_format, Transaction};

/// Parse an ISO timestamp used in test fixtures
pub fn ts(s: &str) -> NaiveDateTime {
    datetime_format::parse(s).unwrap_or_else(|| panic!("bad fixture timestamp: {}", s))
}

/// Untagged transaction at the given timestamp
pub fn tx_at(date: &str, amount: f64, base_category: &str) -> Transaction {
    Transaction::new(ts(date), amount, base_category)
}

/// Three dining purchases one hour apart on Monday 2024-01-08, 09:00 to 11:00
pub fn single_binge() -> Vec<Transaction> {
    vec![
        tx_at("2024-01-08T09:00:00", 12.0, "dining").with_merchant("Cafe Uno"),
        tx_at("2024-01-08T10:00:00", 30.0, "shopping").with_merchant("Mall Store"),
        tx_at("2024-01-08T11:00:00", 8.5, "food").with_merchant("Bakery"),
    ]
}

/// Weekend discretionary spend of 100 vs weekday spend of 50, mid-month
pub fn weekend_heavy() -> Vec<Transaction> {
    vec![
        // Saturday 2024-01-20
        tx_at("2024-01-20T14:00:00", 60.0, "entertainment"),
        // Sunday 2024-01-21
        tx_at("2024-01-21T19:00:00", 40.0, "dining"),
        // Tuesday 2024-01-23
        tx_at("2024-01-23T12:30:00", 50.0, "shopping"),
    ]
}

//! Expiry arithmetic.

use chrono::{DateTime, Utc};

/// Whole days from `now` until `not_after`, truncated toward zero.
///
/// Negative once the certificate has expired.
pub fn days_until_expiry(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (not_after - now).num_days()
}

/// Whether `days_remaining` falls inside the alert threshold.
///
/// The threshold is exclusive: exactly `threshold_days` remaining is not an alert.
pub fn is_expiring_soon(days_remaining: i64, threshold_days: i64) -> bool {
    days_remaining < threshold_days
}

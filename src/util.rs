//! Shared utility functions for LinkAuth.

use axum::http::HeaderMap;

use crate::models::DaysLeft;

pub const SECONDS_PER_DAY: i64 = 86400;

/// Whole days remaining until `expires_at` (floored), or unbounded.
///
/// Negative once the expiry has passed.
pub fn days_left(expires_at: Option<i64>, now: i64) -> DaysLeft {
    match expires_at {
        Some(exp) => DaysLeft::Days((exp - now).div_euclid(SECONDS_PER_DAY)),
        None => DaysLeft::Unbounded,
    }
}

/// Human-readable remaining time for listings: "unbounded", "N days" or "expired".
///
/// Derived from `expires_at` only; the status column plays no part.
pub fn remaining_label(expires_at: Option<i64>, now: i64) -> String {
    match expires_at {
        None => "unbounded".to_string(),
        // Partial days count, so a still-valid key never reads "0 days"
        Some(exp) if exp > now => {
            let days = (exp - now + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY);
            format!("{} days", days)
        }
        Some(_) => "expired".to_string(),
    }
}

/// Start (inclusive) and end (exclusive) of the UTC calendar day containing `now`.
pub fn utc_day_bounds(now: i64) -> (i64, i64) {
    let start = now - now.rem_euclid(SECONDS_PER_DAY);
    (start, start + SECONDS_PER_DAY)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Extract the client IP from proxy headers.
///
/// Tries the first hop of `x-forwarded-for`, then `x-real-ip`.
pub fn client_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    forwarded.or_else(real_ip).map(String::from)
}

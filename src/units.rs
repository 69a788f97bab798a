// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit conversions and shared date/time helpers.

use chrono::{DateTime, NaiveDateTime};

/// Convert a speed in meters per second to kilometers per hour.
pub fn mps_to_kmh(speed: f64) -> f64 {
    3.6 * speed
}

/// Convert meters to kilometers.
pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1e3
}

/// Convert seconds to whole minutes.
///
/// Fractional seconds are truncated before the integer division, so
/// 125.9 s becomes 2 min.
pub fn seconds_to_minutes(seconds: f64) -> i64 {
    (seconds.trunc() as i64) / 60
}

/// Parse an ISO-8601 timestamp as Strava emits it.
///
/// Offsets (including a trailing `Z`) are dropped and the wall-clock time is
/// kept, matching how `start_date_local` is meant to be read.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Format a timestamp for the activity summary (`15.01.2024 10:30:00 Uhr`).
pub fn format_summary_date(ts: &NaiveDateTime) -> String {
    ts.format("%d.%m.%Y %H:%M:%S Uhr").to_string()
}

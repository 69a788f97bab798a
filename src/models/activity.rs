// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Raw Strava activity records and the analytical column layout.

use serde_json::{Map, Value};

/// One raw, already-deserialized activity as returned by Strava.
pub type RawActivity = Map<String, Value>;

/// Columns selected from each raw activity, in output order (after `id`).
pub const ACTIVITY_COLUMNS: [&str; 17] = [
    "name",
    "start_date_local",
    "type",
    "distance",
    "moving_time",
    "elapsed_time",
    "total_elevation_gain",
    "elev_high",
    "elev_low",
    "average_speed",
    "max_speed",
    "average_heartrate",
    "max_heartrate",
    "start_latitude",
    "start_longitude",
    "average_watts",
    "max_watts",
];

/// Normalized type shared by every ride-family activity.
pub const BIKE_TYPE: &str = "Bike";

/// Collapse ride-family activity types into `Bike`.
///
/// `VirtualRide` is first folded into `Ride`, then `Ride` becomes `Bike`.
/// Every other type is returned unchanged.
pub fn normalize_activity_type(activity_type: &str) -> &str {
    let folded = match activity_type {
        "VirtualRide" => "Ride",
        other => other,
    };
    match folded {
        "Ride" => BIKE_TYPE,
        other => other,
    }
}

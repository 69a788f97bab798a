// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Human-readable summary of a single activity.

use crate::error::{AppError, Result};
use crate::models::activity::{normalize_activity_type, RawActivity, BIKE_TYPE};
use crate::units;
use serde_json::Value;
use std::fmt;

/// Ordered key/value summary, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivitySummary {
    entries: Vec<(&'static str, String)>,
}

impl ActivitySummary {
    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    fn push(&mut self, key: &'static str, value: String) {
        self.entries.push((key, value));
    }
}

impl fmt::Display for ActivitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        writeln!(f, "Latest Activity")?;
        for (key, value) in &self.entries {
            writeln!(f, "  {:<width$}  {}", key, value, width = width)?;
        }
        Ok(())
    }
}

/// Summarize one detailed activity.
///
/// Keys, in order: `name`, `type`, `date`, `duration`, `mileage`, `avgHR`,
/// `kcal`, then `average_watts` for ride-family activities only.
pub fn summarize_activity(activity: &RawActivity) -> Result<ActivitySummary> {
    let mut summary = ActivitySummary::default();

    let name = required_str(activity, "name")?;
    let activity_type = normalize_activity_type(required_str(activity, "type")?);
    let start = required_str(activity, "start_date_local")?;
    let start = units::parse_timestamp(start).ok_or_else(|| {
        AppError::SchemaMismatch(format!("start_date_local is not a timestamp: {}", start))
    })?;
    let moving_time = required_f64(activity, "moving_time")?;
    let distance = required_f64(activity, "distance")?;

    summary.push("name", name.to_string());
    summary.push("type", activity_type.to_string());
    summary.push("date", units::format_summary_date(&start));
    summary.push("duration", format!("{:.1} min", moving_time / 60.0));
    summary.push("mileage", format!("{:.1} km", units::meters_to_km(distance)));
    summary.push(
        "avgHR",
        optional_f64(activity, "average_heartrate")?
            .map(|hr| format!("{} bpm", hr.trunc() as i64))
            .unwrap_or_default(),
    );
    summary.push(
        "kcal",
        optional_f64(activity, "calories")?
            .map(|kcal| (kcal.trunc() as i64).to_string())
            .unwrap_or_default(),
    );

    if activity_type == BIKE_TYPE {
        summary.push(
            "average_watts",
            optional_f64(activity, "average_watts")?
                .map(|w| format!("{} W", w.trunc() as i64))
                .unwrap_or_default(),
        );
    }

    Ok(summary)
}

fn field<'a>(activity: &'a RawActivity, key: &str) -> Result<&'a Value> {
    activity
        .get(key)
        .ok_or_else(|| AppError::SchemaMismatch(format!("activity is missing key '{}'", key)))
}

fn required_str<'a>(activity: &'a RawActivity, key: &str) -> Result<&'a str> {
    field(activity, key)?
        .as_str()
        .ok_or_else(|| AppError::SchemaMismatch(format!("'{}' is not a string", key)))
}

fn required_f64(activity: &RawActivity, key: &str) -> Result<f64> {
    optional_f64(activity, key)?
        .ok_or_else(|| AppError::SchemaMismatch(format!("'{}' is null", key)))
}

/// Key must exist; `null` means "not recorded".
fn optional_f64(activity: &RawActivity, key: &str) -> Result<Option<f64>> {
    match field(activity, key)? {
        Value::Null => Ok(None),
        v => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| AppError::SchemaMismatch(format!("'{}' is not numeric", key))),
    }
}

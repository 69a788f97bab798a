// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stream parsing and rider-level power/cadence aggregation.

use crate::error::{AppError, Result};
use crate::models::stream::{StreamSet, StreamType};
use crate::models::{Cell, Table};
use crate::units;
use std::collections::VecDeque;

/// Window (in samples) of the trailing power moving average.
pub const POWER_SMOOTHING_WINDOW: usize = 60;

/// Column holding the smoothed power series.
pub const WATTS_MOVING_AVG: &str = "watts_moving_avg";

/// Constant columns stamped on every row of a per-activity stream table.
pub const STREAM_CONSTANT_COLUMNS: [&str; 3] =
    ["activity_id", "activity_startDate", "activity_name"];

/// Identity of the activity a stream table belongs to.
#[derive(Debug, Clone)]
pub struct StreamActivity<'a> {
    pub id: u64,
    pub name: &'a str,
    /// Activity start (ISO-8601, UTC)
    pub start_date: &'a str,
}

/// Which of the requested stream columns the payload can actually fill.
///
/// Requested order is kept; absent streams (e.g. no power meter) are dropped.
pub fn plan_stream_columns(requested: &[StreamType], available: &StreamSet) -> Vec<StreamType> {
    let mut planned: Vec<StreamType> = Vec::with_capacity(requested.len());
    for stream_type in requested {
        if available.contains_key(stream_type.as_str()) && !planned.contains(stream_type) {
            planned.push(*stream_type);
        }
    }
    planned
}

/// Convert one activity's raw streams into a per-activity table.
///
/// One row per sample of the first available requested stream; later
/// streams are aligned by position. The three constant columns follow
/// the stream columns and appear exactly once, even when no requested
/// stream was available (the table then has no rows).
pub fn parse_activity_stream(
    activity: &StreamActivity<'_>,
    streams: &StreamSet,
    requested: &[StreamType],
) -> Result<Table> {
    let planned = plan_stream_columns(requested, streams);

    let start_date = units::parse_timestamp(activity.start_date).ok_or_else(|| {
        AppError::SchemaMismatch(format!(
            "activity {} has an invalid start date: {}",
            activity.id, activity.start_date
        ))
    })?;

    let mut table: Option<Table> = None;
    for stream_type in &planned {
        let Some(stream) = streams.get(stream_type.as_str()) else {
            continue;
        };
        let values: Vec<Cell> = stream.data.iter().map(Cell::from).collect();
        match table.as_mut() {
            Some(t) => t.set_column(stream_type.as_str(), values),
            None => table = Some(Table::from_column(stream_type.as_str(), values)),
        }
    }
    let mut table = table.unwrap_or_default();

    table.broadcast_column("activity_id", Cell::Int(activity.id as i64));
    table.broadcast_column("activity_startDate", Cell::Timestamp(start_date));
    table.broadcast_column("activity_name", Cell::Text(activity.name.to_string()));

    let skipped: Vec<&str> = requested
        .iter()
        .filter(|t| !planned.contains(*t))
        .map(|t| t.as_str())
        .collect();
    tracing::debug!(
        activity_id = activity.id,
        rows = table.len(),
        skipped = ?skipped,
        "Parsed activity stream"
    );

    Ok(table)
}

/// Trailing mean over `window` samples, starting from a single sample.
///
/// Non-numeric cells count toward the window position but not the mean;
/// a window without any numeric sample yields `Empty`.
pub fn trailing_moving_average(values: &[Cell], window: usize) -> Vec<Cell> {
    let window = window.max(1);
    let mut buffer: VecDeque<Option<f64>> = VecDeque::with_capacity(window);
    let mut sum = 0.0;
    let mut count = 0usize;

    values
        .iter()
        .map(|cell| {
            if buffer.len() == window {
                if let Some(Some(old)) = buffer.pop_front() {
                    sum -= old;
                    count -= 1;
                }
            }
            let v = cell.as_f64();
            if let Some(x) = v {
                sum += x;
                count += 1;
            }
            buffer.push_back(v);

            if count == 0 {
                Cell::Empty
            } else {
                Cell::Float(sum / count as f64)
            }
        })
        .collect()
}

/// Copy of a stream table with `watts_moving_avg` added.
///
/// Returns `None` when the table has no `watts` column.
pub fn with_power_moving_average(table: &Table) -> Option<Table> {
    let watts = table.column_values("watts")?;
    let smoothed = trailing_moving_average(&watts, POWER_SMOOTHING_WINDOW);
    let mut out = table.clone();
    out.set_column(WATTS_MOVING_AVG, smoothed);
    Some(out)
}

/// Rider-level smoothed power samples and the matching cadence samples.
///
/// Both tables have the same length and row `i` of each comes from the
/// same original sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerCadence {
    /// Single `power` column
    pub power: Table,
    /// Single `cadence` column
    pub cadence: Table,
}

/// Smooth power per activity and concatenate power and cadence samples.
///
/// Activities are visited in the given order and samples keep their
/// original order. Tables without a `watts` column contribute nothing.
pub fn aggregate_power_and_cadence(activities: &[Table]) -> PowerCadence {
    let mut power_total: Vec<Cell> = Vec::new();
    let mut cadence_total: Vec<Cell> = Vec::new();
    let mut contributing = 0usize;

    for table in activities {
        let Some(smoothed) = with_power_moving_average(table) else {
            continue;
        };
        contributing += 1;

        let cadence = match smoothed.column_values("cadence") {
            Some(values) => values,
            None => {
                tracing::warn!(
                    activity_id = %table.get(0, "activity_id").cloned().unwrap_or_default(),
                    "Activity has power but no cadence stream"
                );
                vec![Cell::Empty; smoothed.len()]
            }
        };

        if let Some(power) = smoothed.column_values(WATTS_MOVING_AVG) {
            power_total.extend(power);
        }
        cadence_total.extend(cadence);
    }

    tracing::info!(
        activities = activities.len(),
        with_power = contributing,
        samples = power_total.len(),
        "Aggregated power and cadence"
    );

    PowerCadence {
        power: Table::from_column("power", power_total),
        cadence: Table::from_column("cadence", cadence_total),
    }
}

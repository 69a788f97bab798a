// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity table builder.
//!
//! Normalizes a batch of raw Strava activities into one analytical table:
//! 1. Select `id` plus the declared columns, one row per activity
//! 2. Collapse ride-family types into `Bike`
//! 3. Add `distance_km`, `day_of_week` and `month_of_year`
//! 4. Re-express moving/elapsed time in whole minutes
//! 5. Duplicate the minute columns as `*_hr`
//!
//! Missing values stay `Cell::Empty` and render as empty strings.

use crate::error::{AppError, Result};
use crate::models::activity::{normalize_activity_type, RawActivity, ACTIVITY_COLUMNS};
use crate::models::{Cell, Table};
use crate::units;
use chrono::Datelike;

/// Build the analytical activity table from raw activity records.
///
/// Fails with [`AppError::SchemaMismatch`] if any record lacks one of the
/// required keys; no partial table is returned.
pub fn build_activity_table(activities: &[RawActivity]) -> Result<Table> {
    let columns: Vec<&str> = std::iter::once("id").chain(ACTIVITY_COLUMNS).collect();
    let mut table = Table::new(columns.iter().copied());

    for (position, activity) in activities.iter().enumerate() {
        let row = columns
            .iter()
            .map(|&key| {
                activity.get(key).map(Cell::from).ok_or_else(|| {
                    AppError::SchemaMismatch(format!(
                        "activity at position {} is missing key '{}'",
                        position, key
                    ))
                })
            })
            .collect::<Result<Vec<Cell>>>()?;
        table.push_row(row);
    }

    table.map_column("type", |cell| match cell {
        Cell::Text(t) => Cell::Text(normalize_activity_type(t).to_string()),
        other => other.clone(),
    });

    let distance_km = numeric_column(&table, "distance")?
        .into_iter()
        .map(|d| d.map(|m| Cell::Float(units::meters_to_km(m))).unwrap_or_default())
        .collect();
    table.set_column("distance_km", distance_km);

    let start_dates = timestamp_column(&table, "start_date_local")?;
    let day_of_week = start_dates
        .iter()
        .map(|ts| {
            ts.map(|t| Cell::Text(t.format("%A").to_string()))
                .unwrap_or_default()
        })
        .collect();
    let month_of_year = start_dates
        .iter()
        .map(|ts| ts.map(|t| Cell::Int(t.month() as i64)).unwrap_or_default())
        .collect();
    table.set_column(
        "start_date_local",
        start_dates
            .into_iter()
            .map(|ts| ts.map(Cell::Timestamp).unwrap_or_default())
            .collect(),
    );
    table.set_column("day_of_week", day_of_week);
    table.set_column("month_of_year", month_of_year);

    let elapsed = minutes_column(&table, "elapsed_time")?;
    let moving = minutes_column(&table, "moving_time")?;
    table.set_column("elapsed_time", elapsed.clone());
    table.set_column("moving_time", moving.clone());
    // Legacy duplicates: minutes, not hours.
    table.set_column("elapsed_time_hr", elapsed);
    table.set_column("moving_time_hr", moving);

    tracing::debug!(rows = table.len(), "Built activity table");
    Ok(table)
}

/// Numeric view of a column; `None` for missing values.
fn numeric_column(table: &Table, name: &str) -> Result<Vec<Option<f64>>> {
    column_or_mismatch(table, name)?
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Empty => Ok(None),
            c => c.as_f64().map(Some).ok_or_else(|| {
                AppError::SchemaMismatch(format!(
                    "'{}' in row {} is not numeric: {:?}",
                    name, row, c
                ))
            }),
        })
        .collect()
}

fn minutes_column(table: &Table, name: &str) -> Result<Vec<Cell>> {
    Ok(numeric_column(table, name)?
        .into_iter()
        .map(|s| {
            s.map(|secs| Cell::Int(units::seconds_to_minutes(secs)))
                .unwrap_or_default()
        })
        .collect())
}

fn timestamp_column(table: &Table, name: &str) -> Result<Vec<Option<chrono::NaiveDateTime>>> {
    column_or_mismatch(table, name)?
        .enumerate()
        .map(|(row, cell)| match cell {
            Cell::Empty => Ok(None),
            Cell::Text(raw) => units::parse_timestamp(raw).map(Some).ok_or_else(|| {
                AppError::SchemaMismatch(format!(
                    "'{}' in row {} is not a timestamp: {}",
                    name, row, raw
                ))
            }),
            other => Err(AppError::SchemaMismatch(format!(
                "'{}' in row {} is not a timestamp: {:?}",
                name, row, other
            ))),
        })
        .collect()
}

fn column_or_mismatch<'a>(
    table: &'a Table,
    name: &str,
) -> Result<impl Iterator<Item = &'a Cell> + 'a> {
    table
        .column(name)
        .ok_or_else(|| AppError::SchemaMismatch(format!("missing column '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: u64, activity_type: &str, moving: f64) -> RawActivity {
        let value = json!({
            "id": id,
            "name": format!("Activity {}", id),
            "start_date_local": "2024-01-15T10:30:00Z",
            "type": activity_type,
            "distance": 12345.0,
            "moving_time": moving,
            "elapsed_time": 3725,
            "total_elevation_gain": 150.0,
            "elev_high": 300.0,
            "elev_low": 20.0,
            "average_speed": 5.5,
            "max_speed": 12.0,
            "average_heartrate": 140.0,
            "max_heartrate": null,
            "start_latitude": 37.4,
            "start_longitude": -122.1,
            "average_watts": null,
            "max_watts": null
        });
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_column_order_starts_with_id() {
        let table = build_activity_table(&[raw(1, "Run", 600.0)]).unwrap();
        let columns = table.columns();
        assert_eq!(columns[0], "id");
        assert_eq!(columns[1], "name");
        assert_eq!(columns[17], "max_watts");
        assert_eq!(
            &columns[18..],
            &["distance_km", "day_of_week", "month_of_year", "elapsed_time_hr", "moving_time_hr"]
        );
    }

    #[test]
    fn test_derived_calendar_columns() {
        let table = build_activity_table(&[raw(1, "Run", 600.0)]).unwrap();
        // 2024-01-15 was a Monday.
        assert_eq!(table.get(0, "day_of_week"), Some(&Cell::Text("Monday".into())));
        assert_eq!(table.get(0, "month_of_year"), Some(&Cell::Int(1)));
        assert!(table.get(0, "start_date_local").unwrap().as_timestamp().is_some());
    }

    #[test]
    fn test_time_columns_truncate_then_divide() {
        let table = build_activity_table(&[raw(1, "Ride", 125.9)]).unwrap();
        assert_eq!(table.get(0, "moving_time"), Some(&Cell::Int(2)));
        assert_eq!(table.get(0, "moving_time_hr"), Some(&Cell::Int(2)));
        assert_eq!(table.get(0, "elapsed_time"), Some(&Cell::Int(62)));
        assert_eq!(table.get(0, "elapsed_time_hr"), Some(&Cell::Int(62)));
    }

    #[test]
    fn test_null_values_become_empty() {
        let table = build_activity_table(&[raw(1, "Run", 600.0)]).unwrap();
        assert_eq!(table.get(0, "max_heartrate"), Some(&Cell::Empty));
        assert_eq!(table.get(0, "max_heartrate").unwrap().to_string(), "");
    }

    #[test]
    fn test_null_distance_propagates_to_distance_km() {
        let mut activity = raw(1, "Run", 600.0);
        activity.insert("distance".to_string(), json!(null));
        let table = build_activity_table(&[activity]).unwrap();
        assert_eq!(table.get(0, "distance_km"), Some(&Cell::Empty));
    }

    #[test]
    fn test_missing_key_fails_whole_batch() {
        let mut broken = raw(2, "Run", 600.0);
        broken.remove("elev_low");
        let err = build_activity_table(&[raw(1, "Run", 600.0), broken]).unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch(ref msg) if msg.contains("elev_low")));
    }

    #[test]
    fn test_unparseable_start_date_is_schema_mismatch() {
        let mut activity = raw(1, "Run", 600.0);
        activity.insert("start_date_local".to_string(), json!("last tuesday"));
        assert!(matches!(
            build_activity_table(&[activity]),
            Err(AppError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_non_numeric_distance_names_row() {
        let mut activity = raw(2, "Run", 600.0);
        activity.insert("distance".to_string(), json!("far"));
        let err = build_activity_table(&[raw(1, "Run", 600.0), activity]).unwrap_err();
        assert!(matches!(
            err,
            AppError::SchemaMismatch(ref msg) if msg.contains("'distance' in row 1")
        ));
    }

    #[test]
    fn test_string_id_is_kept_as_text() {
        let mut activity = raw(1, "Run", 600.0);
        activity.insert("id".to_string(), json!("abc"));
        let table = build_activity_table(&[activity]).unwrap();
        assert_eq!(table.get(0, "id"), Some(&Cell::Text("abc".into())));
    }

    #[test]
    fn test_empty_batch_yields_empty_table_with_schema() {
        let table = build_activity_table(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 23);
    }
}

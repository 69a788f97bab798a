// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava activity streams (time-series sensor channels).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Stream channels Strava can return for an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    Time,
    Distance,
    Latlng,
    Altitude,
    VelocitySmooth,
    Heartrate,
    Cadence,
    Watts,
    Temp,
    Moving,
    GradeSmooth,
}

impl StreamType {
    pub const ALL: [StreamType; 11] = [
        StreamType::Time,
        StreamType::Distance,
        StreamType::Latlng,
        StreamType::Altitude,
        StreamType::VelocitySmooth,
        StreamType::Heartrate,
        StreamType::Cadence,
        StreamType::Watts,
        StreamType::Temp,
        StreamType::Moving,
        StreamType::GradeSmooth,
    ];

    /// The key Strava uses for this stream (also the output column name).
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamType::Time => "time",
            StreamType::Distance => "distance",
            StreamType::Latlng => "latlng",
            StreamType::Altitude => "altitude",
            StreamType::VelocitySmooth => "velocity_smooth",
            StreamType::Heartrate => "heartrate",
            StreamType::Cadence => "cadence",
            StreamType::Watts => "watts",
            StreamType::Temp => "temp",
            StreamType::Moving => "moving",
            StreamType::GradeSmooth => "grade_smooth",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamType {
    type Err = UnknownStreamType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StreamType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownStreamType(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown stream type: {0}")]
pub struct UnknownStreamType(pub String);

/// One stream as returned by `GET /activities/{id}/streams?key_by_type=true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStream {
    /// Samples, aligned by index with every other stream of the activity
    pub data: Vec<Value>,
    #[serde(default)]
    pub series_type: Option<String>,
    #[serde(default)]
    pub original_size: Option<u64>,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl RawStream {
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            series_type: Some("time".to_string()),
            original_size: None,
            resolution: None,
        }
    }
}

/// All streams fetched for one activity, keyed by stream name.
pub type StreamSet = HashMap<String, RawStream>;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Heart-rate and power training zones.
//!
//! Heart-rate zones (fraction of max HR):
//!
//! | Zone | Purpose            | Range       |
//! |------|--------------------|-------------|
//! | 1    | recovery/easy      | 55% - 65%   |
//! | 2    | aerobic/base       | 55% - 75%   |
//! | 3    | tempo              | 75% - 85%   |
//! | 4    | lactate threshold  | 85% - 90%   |
//! | 5    | anaerobic          | 90% - 100%  |
//!
//! Zone 2 restarts at 55% rather than continuing from 65%.
//!
//! Power zones are bin edges (fraction of FTP): 0, 55%, 75%, 90%, 105%
//! and 1000% as an open-ended top.

use crate::models::Table;
use serde::Serialize;

/// Heart-rate zone fractions of max HR, `(lower, upper)`.
const HEART_RATE_ZONE_FRACTIONS: [(f64, f64); 5] = [
    (0.55, 0.65),
    (0.55, 0.75),
    (0.75, 0.85),
    (0.85, 0.90),
    (0.90, 1.00),
];

/// Power zone edge fractions of FTP.
const POWER_ZONE_EDGE_FRACTIONS: [f64; 6] = [0.00, 0.55, 0.75, 0.90, 1.05, 10.00];

/// Inclusive zone interval in absolute units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneBounds {
    pub lower: f64,
    pub upper: f64,
}

impl ZoneBounds {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Heart-rate zones in bpm derived from a maximum heart rate.
pub fn heart_rate_zones(max_heart_rate: f64) -> [ZoneBounds; 5] {
    HEART_RATE_ZONE_FRACTIONS.map(|(lower, upper)| ZoneBounds {
        lower: lower * max_heart_rate,
        upper: upper * max_heart_rate,
    })
}

/// Power zone bin edges in watts derived from FTP. Strictly increasing for FTP > 0.
pub fn power_zone_edges(ftp: f64) -> [f64; 6] {
    POWER_ZONE_EDGE_FRACTIONS.map(|fraction| fraction * ftp)
}

/// First (1-based) heart-rate zone containing `bpm`.
///
/// Because zones 1 and 2 overlap, a value in 55%–65% reports zone 1.
pub fn heart_rate_zone_for(bpm: f64, zones: &[ZoneBounds]) -> Option<usize> {
    zones.iter().position(|z| z.contains(bpm)).map(|i| i + 1)
}

/// Count `power` samples per zone using right-closed bins `(e[i], e[i+1]]`.
///
/// Samples at or below the first edge, above the last edge, or missing are
/// not counted.
pub fn power_zone_distribution(power: &Table, edges: &[f64; 6]) -> [usize; 5] {
    let mut counts = [0usize; 5];
    let Some(samples) = power.column("power") else {
        return counts;
    };
    for watts in samples.filter_map(|c| c.as_f64()) {
        if let Some(bin) = edges
            .windows(2)
            .position(|w| w[0] < watts && watts <= w[1])
        {
            counts[bin] += 1;
        }
    }
    counts
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Ride-Metrics: normalize Strava activities and derive training metrics
//!
//! This crate turns raw Strava activities and their sensor streams into
//! analytical tables, derives heart-rate and power zones, and keeps the
//! Strava credential fresh across long batch pulls.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod units;

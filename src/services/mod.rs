// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity_table;
pub mod analysis;
pub mod athlete;
pub mod credential_store;
pub mod credentials;
pub mod strava;
pub mod streams;
pub mod summary;
pub mod zones;

pub use activity_table::build_activity_table;
pub use analysis::{AnalysisReport, AnalysisRunner, AthleteThresholds};
pub use credential_store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use credentials::{CredentialManager, RefreshOutcome, TokenRefresher};
pub use strava::StravaClient;
pub use streams::{aggregate_power_and_cadence, parse_activity_stream, PowerCadence};
pub use summary::{summarize_activity, ActivitySummary};

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end analysis run.
//!
//! Handles the batch workflow:
//! 1. Check (and refresh) the credential before each Strava call
//! 2. Fetch recent activities and normalize them into the activity table
//! 3. Summarize the latest activity from its detailed record
//! 4. Fetch and parse streams per activity, skipping activities without any
//! 5. Aggregate smoothed power and cadence, then bin power into zones

use crate::error::{AppError, Result};
use crate::models::stream::StreamType;
use crate::models::{Credential, RawActivity, Session, Table};
use crate::services::activity_table::build_activity_table;
use crate::services::credential_store::CredentialStore;
use crate::services::credentials::{CredentialManager, TokenRefresher};
use crate::services::streams::{
    aggregate_power_and_cadence, parse_activity_stream, PowerCadence, StreamActivity,
};
use crate::services::strava::StravaClient;
use crate::services::summary::{summarize_activity, ActivitySummary};
use crate::services::zones::{
    heart_rate_zones, power_zone_distribution, power_zone_edges, ZoneBounds,
};

/// Streams requested for every activity.
pub const ANALYSIS_STREAMS: [StreamType; 4] = [
    StreamType::Time,
    StreamType::Watts,
    StreamType::Cadence,
    StreamType::Heartrate,
];

/// Physiological inputs for zone calculations.
#[derive(Debug, Clone, Copy)]
pub struct AthleteThresholds {
    pub max_heart_rate: f64,
    pub ftp: f64,
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub activities: Table,
    pub latest: Option<ActivitySummary>,
    pub power_cadence: PowerCadence,
    pub heart_rate_zones: [ZoneBounds; 5],
    pub power_zone_edges: [f64; 6],
    /// Smoothed power samples per power zone
    pub power_zone_counts: [usize; 5],
    /// Activities whose streams Strava could not supply
    pub skipped_streams: Vec<u64>,
}

/// Drives a batch pull against Strava.
pub struct AnalysisRunner<S, R> {
    client: StravaClient,
    credentials: CredentialManager<S, R>,
}

impl<S: CredentialStore, R: TokenRefresher> AnalysisRunner<S, R> {
    pub fn new(client: StravaClient, credentials: CredentialManager<S, R>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialManager<S, R> {
        &self.credentials
    }

    /// Run the full pipeline for the `limit` most recent activities.
    pub async fn run(&self, limit: u32, thresholds: AthleteThresholds) -> Result<AnalysisReport> {
        let mut credential = self.credentials.store().load()?;

        let session = self.session(&mut credential).await?;
        let raw = self
            .client
            .list_activities(&session.access_token, limit)
            .await?;
        let activities = build_activity_table(&raw)?;

        let latest = match raw.first() {
            Some(first) => {
                let id = activity_id(first, 0)?;
                let session = self.session(&mut credential).await?;
                let detail = self.client.get_activity(&session.access_token, id).await?;
                Some(summarize_activity(&detail)?)
            }
            None => None,
        };

        let mut stream_tables = Vec::with_capacity(raw.len());
        let mut skipped_streams = Vec::new();
        for (position, activity) in raw.iter().enumerate() {
            let (id, name, start_date) = stream_identity(activity, position)?;
            let session = self.session(&mut credential).await?;
            let streams = match self
                .client
                .get_streams(&session.access_token, id, &ANALYSIS_STREAMS)
                .await
            {
                Ok(streams) => streams,
                Err(AppError::StreamUnavailable(missing)) => {
                    skipped_streams.push(missing);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let identity = StreamActivity {
                id,
                name,
                start_date,
            };
            stream_tables.push(parse_activity_stream(&identity, &streams, &ANALYSIS_STREAMS)?);
        }

        let power_cadence = aggregate_power_and_cadence(&stream_tables);
        let edges = power_zone_edges(thresholds.ftp);
        let power_zone_counts = power_zone_distribution(&power_cadence.power, &edges);

        tracing::info!(
            activities = activities.len(),
            stream_tables = stream_tables.len(),
            skipped = skipped_streams.len(),
            "Analysis run complete"
        );

        Ok(AnalysisReport {
            activities,
            latest,
            power_cadence,
            heart_rate_zones: heart_rate_zones(thresholds.max_heart_rate),
            power_zone_edges: edges,
            power_zone_counts,
            skipped_streams,
        })
    }

    /// Check the credential and carry the one in force forward.
    async fn session(&self, credential: &mut Credential) -> Result<Session> {
        let outcome = self.credentials.check_and_refresh(credential).await?;
        *credential = outcome.credential;
        Ok(outcome.session)
    }
}

/// Strava id of the activity at `position`; stream and detail lookups
/// need an integer id.
fn activity_id(activity: &RawActivity, position: usize) -> Result<u64> {
    let id = activity.get("id");
    id.and_then(|v| v.as_u64()).ok_or_else(|| {
        AppError::SchemaMismatch(format!(
            "activity at position {} has no integer id: {}",
            position,
            id.map(|v| v.to_string()).unwrap_or_else(|| "missing".to_string())
        ))
    })
}

fn stream_identity(activity: &RawActivity, position: usize) -> Result<(u64, &str, &str)> {
    let id = activity_id(activity, position)?;
    let name = activity.get("name").and_then(|v| v.as_str()).unwrap_or("");
    let start_date = activity
        .get("start_date")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::SchemaMismatch(format!("activity {} has no start_date", id)))?;
    Ok((id, name, start_date))
}

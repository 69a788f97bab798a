// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ride-Metrics batch runner
//!
//! Pulls recent Strava activities, normalizes them, and reports the latest
//! activity, training zones and the rider's power distribution.

use anyhow::Context;
use ride_metrics::{
    config::Config,
    services::{
        athlete::{describe_athlete, shoe_mileage_table},
        strava::DEFAULT_TOKEN_URL,
        AnalysisRunner, AthleteThresholds, CredentialManager, FileCredentialStore, StravaClient,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        athlete_id = ?config.strava_athlete_id,
        limit = config.activity_limit,
        "Starting Ride-Metrics run"
    );

    let client = StravaClient::new(&config.strava_api_url, DEFAULT_TOKEN_URL);
    let store = FileCredentialStore::new(&config.token_file);
    let credentials = CredentialManager::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        store,
        client.clone(),
    );

    let outcome = credentials
        .ensure_session()
        .await
        .context("Failed to establish Strava session")?;
    let athlete = client.get_athlete(&outcome.session.access_token).await?;
    tracing::info!("{}", describe_athlete(&athlete));
    for row in shoe_mileage_table(&athlete).rows() {
        tracing::info!(shoe = %row[0], mileage_km = %row[1], "Shoe mileage");
    }

    let runner = AnalysisRunner::new(client, credentials);
    let report = runner
        .run(
            config.activity_limit,
            AthleteThresholds {
                max_heart_rate: config.max_heart_rate,
                ftp: config.ftp,
            },
        )
        .await?;

    if let Some(latest) = &report.latest {
        print!("{}", latest);
    }

    for (i, zone) in report.heart_rate_zones.iter().enumerate() {
        tracing::info!(
            zone = i + 1,
            lower = zone.lower,
            upper = zone.upper,
            "Heart rate zone"
        );
    }
    tracing::info!(
        edges = ?report.power_zone_edges,
        counts = ?report.power_zone_counts,
        samples = report.power_cadence.power.len(),
        "Power zone distribution"
    );
    if !report.skipped_streams.is_empty() {
        tracing::warn!(activities = ?report.skipped_streams, "Activities without streams");
    }

    println!("{}", serde_json::to_string(&report.activities)?);
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,ride_metrics=debug")),
        )
        .with(format)
        .init();
}

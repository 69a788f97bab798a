// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! No variant is retried internally: every failure is surfaced to the caller.

use crate::models::Credential;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A raw activity record is missing a required key or carries a
    /// value of the wrong shape. Fatal to the whole batch.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Strava could not supply any stream data for the activity.
    #[error("No stream data available for activity {0}")]
    StreamUnavailable(u64),

    /// Refreshing an expired credential failed; the caller's session is stale.
    #[error("Credential refresh failed: {0}")]
    CredentialRefreshFailed(String),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    /// Strava issued a new credential but it could not be saved. The
    /// refresh token has already rotated, so `credential` is the only
    /// usable copy.
    #[error("Refreshed credential could not be saved: {reason}")]
    CredentialNotPersisted {
        credential: Box<Credential>,
        reason: String,
    },
}

impl AppError {
    /// Message used when Strava rejects the bearer token (HTTP 401).
    pub const STRAVA_TOKEN_ERROR: &'static str = "Token expired or invalid";

    /// Message used when Strava rate limits us (HTTP 429).
    pub const STRAVA_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Whether this error means the access token is no longer usable.
    pub fn is_strava_token_error(&self) -> bool {
        match self {
            AppError::StravaApi(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("token") || msg.contains("invalid")
            }
            AppError::CredentialRefreshFailed(_) => true,
            _ => false,
        }
    }

    /// Whether this error is a Strava rate limit response.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_RATE_LIMIT)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;

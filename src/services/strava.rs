// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching activities, streams and the athlete.
//!
//! Handles:
//! - Activity listing and detail fetching (raw JSON records)
//! - Stream fetching keyed by stream type
//! - Token refresh (as the credential manager's [`TokenRefresher`])
//! - Rate limit and expired-token detection
//!
//! No retries: every failure is surfaced to the caller.

use crate::config::DEFAULT_API_URL;
use crate::error::AppError;
use crate::models::stream::{StreamSet, StreamType};
use crate::models::{Athlete, Credential, RawActivity};
use crate::services::credentials::TokenRefresher;
use serde::Deserialize;

/// Strava OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_TOKEN_URL)
    }
}

impl StravaClient {
    /// Create a client against the given API base and token endpoint.
    pub fn new(base_url: &str, token_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token_url: token_url.to_string(),
        }
    }

    /// List the most recent activities of the authenticated athlete.
    pub async fn list_activities(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<RawActivity>, AppError> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("per_page", limit.to_string()), ("page", "1".to_string())])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        let activities: Vec<RawActivity> = self.check_response_json(response).await?;
        tracing::info!(requested = limit, received = activities.len(), "Fetched activities");
        Ok(activities)
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<RawActivity, AppError> {
        let url = format!("{}/activities/{}", self.base_url, activity_id);
        self.get_json(&url, access_token).await
    }

    /// Get the requested streams of an activity, keyed by stream type.
    ///
    /// Streams the activity does not have are simply absent from the map.
    pub async fn get_streams(
        &self,
        access_token: &str,
        activity_id: u64,
        types: &[StreamType],
    ) -> Result<StreamSet, AppError> {
        let url = format!("{}/activities/{}/streams", self.base_url, activity_id);
        let keys = types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("keys", keys.as_str()),
                ("key_by_type", "true"),
                ("series_type", "time"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        if response.status().as_u16() == 404 {
            tracing::warn!(activity_id, "Strava has no streams for activity");
            return Err(AppError::StreamUnavailable(activity_id));
        }

        let streams: StreamSet = self.check_response_json(response).await?;
        if streams.is_empty() {
            return Err(AppError::StreamUnavailable(activity_id));
        }

        tracing::debug!(
            activity_id,
            streams = ?streams.keys().collect::<Vec<_>>(),
            "Fetched streams"
        );
        Ok(streams)
    }

    /// Get authenticated athlete profile.
    pub async fn get_athlete(&self, access_token: &str) -> Result<Athlete, AppError> {
        let url = format!("{}/athlete", self.base_url);
        self.get_json(&url, access_token).await
    }

    /// Exchange a refresh token for a new credential.
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Credential, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        let token: TokenRefreshResponse = self.check_response_json(response).await?;
        Ok(Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: token.expires_at,
        })
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

impl TokenRefresher for StravaClient {
    async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Credential, AppError> {
        self.refresh_token(client_id, client_secret, refresh_token)
            .await
            .map_err(|e| AppError::CredentialRefreshFailed(e.to_string()))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    refresh_token: String,
    expires_at: i64,
}

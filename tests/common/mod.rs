// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use ride_metrics::error::{AppError, Result};
use ride_metrics::models::{Credential, RawActivity, StreamSet};
use ride_metrics::services::TokenRefresher;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read a fixture file from `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(name: &str) -> String {
    let path = Path::new("tests/fixtures").join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// The three-activity batch fixture.
#[allow(dead_code)]
pub fn fixture_activities() -> Vec<RawActivity> {
    serde_json::from_str(&fixture("activities.json")).expect("Failed to parse activities fixture")
}

/// A stream payload fixture keyed by stream type.
#[allow(dead_code)]
pub fn fixture_streams(name: &str) -> StreamSet {
    serde_json::from_str(&fixture(name)).expect("Failed to parse streams fixture")
}

#[allow(dead_code)]
pub fn credential(access: &str, refresh: &str, expires_at: i64) -> Credential {
    Credential {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_at,
    }
}

/// Refresher that records calls and hands out a fixed credential.
#[allow(dead_code)]
pub struct CountingRefresher {
    pub calls: AtomicUsize,
    pub issued: Credential,
    pub fail: bool,
}

#[allow(dead_code)]
impl CountingRefresher {
    pub fn issuing(issued: Credential) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            issued,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            issued: credential("", "", 0),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenRefresher for CountingRefresher {
    async fn refresh(
        &self,
        _client_id: &str,
        _client_secret: &str,
        _refresh_token: &str,
    ) -> Result<Credential> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::CredentialRefreshFailed("HTTP 400: invalid_grant".into()));
        }
        Ok(self.issued.clone())
    }
}

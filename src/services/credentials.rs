// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential lifecycle management.
//!
//! Every upstream call must be preceded by [`CredentialManager::check_and_refresh`]:
//! - `VALID`: copy the stored fields into a fresh [`Session`]; no I/O
//! - `EXPIRED`: refresh with Strava, persist the new credential, then
//!   build the session from it
//!
//! The session is returned as a value; callers pass it on to later calls.

use crate::error::{AppError, Result};
use crate::models::{Credential, CredentialState, Session};
use crate::services::credential_store::CredentialStore;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Exchanges a refresh token for a new credential.
#[allow(async_fn_in_trait)]
pub trait TokenRefresher {
    async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Credential>;
}

/// Result of a check-and-refresh pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Session fields to use for subsequent API calls
    pub session: Session,
    /// The credential now in force
    pub credential: Credential,
    /// State the credential was found in
    pub prior_state: CredentialState,
}

/// Keeps the Strava session authenticated.
///
/// The `EXPIRED → VALID` transition is serialized, and re-checked against
/// the store once the lock is held, so concurrent callers trigger at most
/// one refresh per expiry window.
pub struct CredentialManager<S, R> {
    client_id: String,
    client_secret: String,
    store: S,
    refresher: R,
    refresh_lock: Mutex<()>,
}

impl<S: CredentialStore, R: TokenRefresher> CredentialManager<S, R> {
    pub fn new(client_id: String, client_secret: String, store: S, refresher: R) -> Self {
        Self {
            client_id,
            client_secret,
            store,
            refresher,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn refresher(&self) -> &R {
        &self.refresher
    }

    /// Load the persisted credential and check it.
    pub async fn ensure_session(&self) -> Result<RefreshOutcome> {
        let credential = self.store.load()?;
        self.check_and_refresh(&credential).await
    }

    /// Check `credential` against the current time, refreshing if expired.
    pub async fn check_and_refresh(&self, credential: &Credential) -> Result<RefreshOutcome> {
        self.check_and_refresh_at(credential, Utc::now()).await
    }

    /// Check `credential` against `now`, refreshing if expired.
    ///
    /// On refresh failure nothing is persisted and
    /// [`AppError::CredentialRefreshFailed`] is returned; the caller's
    /// previous session is untouched. If the new credential cannot be
    /// saved it is returned inside [`AppError::CredentialNotPersisted`].
    pub async fn check_and_refresh_at(
        &self,
        credential: &Credential,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome> {
        if !credential.is_expired_at(now) {
            return Ok(self.still_valid(credential));
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited.
        match self.store.load() {
            Ok(stored) if !stored.is_expired_at(now) => {
                tracing::debug!("Credential already refreshed by another caller");
                return Ok(RefreshOutcome {
                    session: Session::from(&stored),
                    credential: stored,
                    prior_state: CredentialState::Expired,
                });
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "No stored credential to re-check"),
        }

        tracing::info!("Token has expired, will refresh");
        let refreshed = self
            .refresher
            .refresh(
                &self.client_id,
                &self.client_secret,
                &credential.refresh_token,
            )
            .await
            .map_err(|e| match e {
                AppError::CredentialRefreshFailed(_) => e,
                other => AppError::CredentialRefreshFailed(other.to_string()),
            })?;

        if let Err(e) = self.store.save(&refreshed) {
            tracing::warn!(
                error = %e,
                expires_at = %refreshed.expires_at_display(),
                "Refreshed credential was not persisted"
            );
            return Err(AppError::CredentialNotPersisted {
                credential: Box::new(refreshed),
                reason: e.to_string(),
            });
        }

        tracing::info!(
            expires_at = %refreshed.expires_at_display(),
            "Token refreshed"
        );
        Ok(RefreshOutcome {
            session: Session::from(&refreshed),
            credential: refreshed,
            prior_state: CredentialState::Expired,
        })
    }

    fn still_valid(&self, credential: &Credential) -> RefreshOutcome {
        tracing::info!(
            expires_at = %credential.expires_at_display(),
            "Token still valid"
        );
        RefreshOutcome {
            session: Session::from(credential),
            credential: credential.clone(),
            prior_state: CredentialState::Valid,
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential check-and-refresh behaviour.

mod common;

use chrono::{Duration, Utc};
use common::{credential, CountingRefresher};
use ride_metrics::error::AppError;
use ride_metrics::models::{CredentialState, Session};
use ride_metrics::services::{
    CredentialManager, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
use std::sync::Arc;

#[tokio::test]
async fn test_expired_credential_refreshes_once_and_persists_once() {
    let expired = credential("old_access", "old_refresh", (Utc::now() - Duration::hours(1)).timestamp());
    let fresh_expiry = (Utc::now() + Duration::hours(6)).timestamp();
    let manager = CredentialManager::new(
        "client".into(),
        "secret".into(),
        MemoryCredentialStore::new(expired.clone()),
        CountingRefresher::issuing(credential("new_access", "new_refresh", fresh_expiry)),
    );

    let outcome = manager.check_and_refresh(&expired).await.unwrap();

    assert_eq!(manager.refresher().call_count(), 1);
    assert_eq!(manager.store().save_count(), 1);
    assert_eq!(outcome.prior_state, CredentialState::Expired);
    assert_eq!(
        outcome.session,
        Session {
            access_token: "new_access".into(),
            refresh_token: "new_refresh".into(),
            token_expires_at: fresh_expiry,
        }
    );
    assert_eq!(manager.store().load().unwrap(), outcome.credential);
}

#[tokio::test]
async fn test_valid_credential_only_copies_fields() {
    let expiry = (Utc::now() + Duration::hours(2)).timestamp();
    let valid = credential("access", "refresh", expiry);
    let manager = CredentialManager::new(
        "client".into(),
        "secret".into(),
        MemoryCredentialStore::new(valid.clone()),
        CountingRefresher::issuing(credential("unused", "unused", 0)),
    );

    // Idempotent while still valid.
    for _ in 0..3 {
        let outcome = manager.check_and_refresh(&valid).await.unwrap();
        assert_eq!(outcome.prior_state, CredentialState::Valid);
        assert_eq!(outcome.session.access_token, "access");
        assert_eq!(outcome.session.refresh_token, "refresh");
        assert_eq!(outcome.session.token_expires_at, expiry);
    }

    assert_eq!(manager.refresher().call_count(), 0);
    assert_eq!(manager.store().save_count(), 0);
}

#[tokio::test]
async fn test_refresh_failure_leaves_store_untouched() {
    let expired = credential("old_access", "old_refresh", 1);
    let manager = CredentialManager::new(
        "client".into(),
        "secret".into(),
        MemoryCredentialStore::new(expired.clone()),
        CountingRefresher::failing(),
    );

    let err = manager.check_and_refresh(&expired).await.unwrap_err();

    assert!(matches!(err, AppError::CredentialRefreshFailed(_)));
    assert!(err.is_strava_token_error());
    assert_eq!(manager.store().save_count(), 0);
    assert_eq!(manager.store().load().unwrap(), expired);
}

#[tokio::test]
async fn test_concurrent_checks_refresh_at_most_once() {
    let expired = credential("old_access", "old_refresh", 1);
    let fresh_expiry = (Utc::now() + Duration::hours(6)).timestamp();
    let manager = Arc::new(CredentialManager::new(
        "client".into(),
        "secret".into(),
        MemoryCredentialStore::new(expired.clone()),
        CountingRefresher::issuing(credential("new_access", "new_refresh", fresh_expiry)),
    ));

    let (a, b) = tokio::join!(
        manager.check_and_refresh(&expired),
        manager.check_and_refresh(&expired)
    );

    assert_eq!(a.unwrap().session.access_token, "new_access");
    assert_eq!(b.unwrap().session.access_token, "new_access");
    assert_eq!(manager.refresher().call_count(), 1);
    assert_eq!(manager.store().save_count(), 1);
}

#[tokio::test]
async fn test_ensure_session_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access_token.json");
    let store = FileCredentialStore::new(&path);
    store.save(&credential("old_access", "old_refresh", 1)).unwrap();

    let fresh_expiry = (Utc::now() + Duration::hours(6)).timestamp();
    let manager = CredentialManager::new(
        "client".into(),
        "secret".into(),
        store,
        CountingRefresher::issuing(credential("new_access", "new_refresh", fresh_expiry)),
    );

    let outcome = manager.ensure_session().await.unwrap();
    assert_eq!(outcome.session.access_token, "new_access");

    let reloaded = FileCredentialStore::new(&path).load().unwrap();
    assert_eq!(reloaded, credential("new_access", "new_refresh", fresh_expiry));
}

//! Strava OAuth credential and the session copy derived from it.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The access/refresh token pair with its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for API calls
    pub access_token: String,
    /// Token exchanged for a new pair once the access token expires
    pub refresh_token: String,
    /// Expiry as Unix seconds
    pub expires_at: i64,
}

impl Credential {
    /// Whether the access token has expired at `now`.
    ///
    /// A credential is still valid at exactly `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at
    }

    /// Expiry rendered in local time for log lines.
    pub fn expires_at_display(&self) -> String {
        match Local.timestamp_opt(self.expires_at, 0).single() {
            Some(dt) => dt.format("%a, %d %b %Y %H:%M:%S %Z").to_string(),
            None => self.expires_at.to_string(),
        }
    }
}

/// Transient copy of the credential fields held by an active API session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_expires_at: i64,
}

impl From<&Credential> for Session {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token.clone(),
            refresh_token: credential.refresh_token.clone(),
            token_expires_at: credential.expires_at,
        }
    }
}

/// Lifecycle state of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Valid,
    Expired,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(expires_at: i64) -> Credential {
        Credential {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_expiry_boundary_is_still_valid() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(!credential(1_700_000_000).is_expired_at(now));
        assert!(credential(1_699_999_999).is_expired_at(now));
        assert!(!credential(1_700_000_001).is_expired_at(now));
    }

    #[test]
    fn test_session_copies_all_three_fields() {
        let session = Session::from(&credential(42));
        assert_eq!(session.access_token, "a");
        assert_eq!(session.refresh_token, "r");
        assert_eq!(session.token_expires_at, 42);
    }
}

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local runs.

use std::env;
use std::path::PathBuf;

/// Default Strava REST endpoint.
pub const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava credentials ---
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Base URL of the Strava REST API
    pub strava_api_url: String,
    /// Athlete the pulls are made for (informational only)
    pub strava_athlete_id: Option<u64>,
    /// Where the credential store keeps the token triple
    pub token_file: PathBuf,

    // --- Analysis inputs ---
    /// Number of activities fetched per run
    pub activity_limit: u32,
    /// Maximum heart rate used for heart-rate zones (bpm)
    pub max_heart_rate: f64,
    /// Functional threshold power used for power zones (watts)
    pub ftp: f64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_api_url: DEFAULT_API_URL.to_string(),
            strava_athlete_id: None,
            token_file: PathBuf::from("access_token.json"),
            activity_limit: 100,
            max_heart_rate: 190.0,
            ftp: 250.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            strava_athlete_id: parse_optional("STRAVA_ATHLETE_ID")?,
            token_file: env::var("STRAVA_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("access_token.json")),
            activity_limit: parse_optional("ACTIVITY_LIMIT")?.unwrap_or(100),
            max_heart_rate: parse_optional("MAX_HEART_RATE")?.unwrap_or(190.0),
            ftp: parse_optional("FTP")?.unwrap_or(250.0),
        })
    }
}

/// Read and parse an optional variable; present-but-garbled is an error.
fn parse_optional<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("STRAVA_CLIENT_ID", "test_id");
        env::set_var("STRAVA_CLIENT_SECRET", " test_secret\n");
        env::set_var("FTP", "280");
        env::remove_var("ACTIVITY_LIMIT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.strava_client_secret, "test_secret");
        assert_eq!(config.activity_limit, 100);
        assert_eq!(config.ftp, 280.0);

        env::remove_var("FTP");
    }

    #[test]
    fn test_parse_optional_rejects_garbage() {
        env::set_var("RIDE_METRICS_TEST_GARBAGE", "not-a-number");
        let result: Result<Option<u32>, _> = parse_optional("RIDE_METRICS_TEST_GARBAGE");
        assert!(matches!(result, Err(ConfigError::Invalid(_, _))));
        env::remove_var("RIDE_METRICS_TEST_GARBAGE");
    }
}

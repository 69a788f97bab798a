//! Athlete profile and gear returned by `GET /athlete`.

use serde::{Deserialize, Serialize};

/// Authenticated athlete profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Running shoes (only present on the detailed representation)
    #[serde(default)]
    pub shoes: Vec<Gear>,
}

/// A piece of gear (shoe or bike).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gear {
    pub id: String,
    pub name: String,
    /// Distance logged with this gear in meters
    #[serde(default)]
    pub distance: f64,
    /// Distance in the athlete's preferred unit, when Strava provides it
    #[serde(default)]
    pub converted_distance: Option<f64>,
}

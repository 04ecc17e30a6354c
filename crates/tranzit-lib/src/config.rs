//! Runtime configuration for transit data access and planning.
//!
//! # Environment Variables
//!
//! - `TRANZY_API_KEY`: API key for the live open-data API
//! - `TRANZY_BASE_URL`: API base URL (default: `https://api.tranzy.ai/v1/opendata`)
//! - `TRANZY_AGENCY_ID`: default agency (default: `1`)
//! - `TRANZY_TIMEOUT_SECS`: HTTP timeout in seconds (default: `10`)
//! - `TRANZIT_PROXIMITY_METERS`: stop-to-shape proximity threshold (default: `20`)
//! - `TRANZIT_SNAPSHOT_PATH`: serve data from a JSON snapshot instead of the API

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::direct::DEFAULT_PROXIMITY_METERS;

pub const DEFAULT_BASE_URL: &str = "https://api.tranzy.ai/v1/opendata";
pub const DEFAULT_AGENCY_ID: &str = "1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_KEY_ENV: &str = "TRANZY_API_KEY";
pub const BASE_URL_ENV: &str = "TRANZY_BASE_URL";
pub const AGENCY_ID_ENV: &str = "TRANZY_AGENCY_ID";
pub const TIMEOUT_ENV: &str = "TRANZY_TIMEOUT_SECS";
pub const PROXIMITY_ENV: &str = "TRANZIT_PROXIMITY_METERS";
pub const SNAPSHOT_ENV: &str = "TRANZIT_SNAPSHOT_PATH";

/// Injected settings for data access and the direct-route finder.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub agency_id: String,
    pub timeout: Duration,
    pub proximity_meters: f64,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            agency_id: DEFAULT_AGENCY_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proximity_meters: DEFAULT_PROXIMITY_METERS,
            snapshot_path: None,
        }
    }
}

impl TransitConfig {
    /// Create configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TransitConfig::from_env`] but reads values through `lookup`,
    /// so tests do not have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = non_empty(TIMEOUT_ENV)
            .and_then(|v| parse_or_warn::<u64>(TIMEOUT_ENV, &v))
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        let proximity_meters = non_empty(PROXIMITY_ENV)
            .and_then(|v| parse_or_warn::<f64>(PROXIMITY_ENV, &v))
            .and_then(usable_proximity)
            .unwrap_or(defaults.proximity_meters);

        Self {
            base_url: non_empty(BASE_URL_ENV)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            api_key: non_empty(API_KEY_ENV),
            agency_id: non_empty(AGENCY_ID_ENV).unwrap_or(defaults.agency_id),
            timeout,
            proximity_meters,
            snapshot_path: non_empty(SNAPSHOT_ENV).map(PathBuf::from),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_agency(mut self, agency_id: impl Into<String>) -> Self {
        self.agency_id = agency_id.into();
        self
    }

    pub fn with_proximity_meters(mut self, meters: f64) -> Self {
        self.proximity_meters = meters;
        self
    }

    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value, "ignoring unparsable configuration value");
            None
        }
    }
}

fn usable_proximity(meters: f64) -> Option<f64> {
    if meters.is_finite() && meters >= 0.0 {
        Some(meters)
    } else {
        warn!(
            key = PROXIMITY_ENV,
            value = meters,
            "proximity must be a non-negative distance, using default"
        );
        None
    }
}

//! Prometheus metrics for Tranzit microservices.
//!
//! - [`MetricsConfig`]: whether metrics are exported and where
//! - [`init_metrics`]: install the Prometheus recorder
//! - [`metrics_handler`]: axum handler rendering the exposition text
//! - Business metric helpers for the route and nearest-stop services
//!
//! # Example
//!
//! ```no_run
//! use tranzit_service_shared::metrics::{MetricsConfig, init_metrics, metrics_handler};
//! use axum::{Router, routing::get};
//!
//! let config = MetricsConfig::from_env();
//! if let Err(err) = init_metrics(&config) {
//!     eprintln!("metrics unavailable: {err}");
//! }
//!
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Configuration for the metrics system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path the exposition endpoint is mounted on.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Read `METRICS_ENABLED` and `METRICS_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Only the literal `false` disables metrics. A path without a leading
    /// slash gets one, so the value is always mountable on a router.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let path = match lookup("METRICS_PATH") {
            Some(p) if !p.trim().is_empty() => {
                let p = p.trim();
                if p.starts_with('/') {
                    p.to_string()
                } else {
                    format!("/{}", p)
                }
            }
            _ => "/metrics".to_string(),
        };

        Self { enabled, path }
    }
}

/// Install the Prometheus recorder.
///
/// # Errors
///
/// Fails when metrics are disabled, when a recorder is already installed, or
/// when the exporter cannot be built.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)?;

    Ok(())
}

/// Returns `None` until [`init_metrics`] succeeds.
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
    PROMETHEUS_HANDLE.get()
}

/// Render Prometheus exposition text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => {
                write!(f, "failed to install metrics recorder: {}", e)
            }
        }
    }
}

impl std::error::Error for MetricsError {}

// =============================================================================
// Business Metrics Helpers
// =============================================================================

/// Increment `tranzit_direct_routes_found_total`.
///
/// Labelled by service only; the agency comes from request input.
pub fn record_route_found(service: &str) {
    metrics::counter!(
        "tranzit_direct_routes_found_total",
        "service" => service.to_string()
    )
    .increment(1);
}

/// Increment `tranzit_direct_routes_failed_total`.
///
/// # Arguments
///
/// * `reason` - e.g. "not_found", "unknown_stop", "upstream", "validation_error"
/// * `service` - The service name (e.g., "route")
pub fn record_route_failed(reason: &str, service: &str) {
    metrics::counter!(
        "tranzit_direct_routes_failed_total",
        "reason" => reason.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record the polyline length of a found route in `tranzit_route_polyline_points`.
pub fn record_polyline_points(points: usize) {
    metrics::histogram!("tranzit_route_polyline_points").record(points as f64);
}

/// Increment `tranzit_nearest_stop_queries_total`.
///
/// `outcome` is "found", "no_stops", "upstream" or "validation_error".
pub fn record_nearest_stop_query(outcome: &str, service: &str) {
    metrics::counter!(
        "tranzit_nearest_stop_queries_total",
        "outcome" => outcome.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
}

/// Record the distance to the matched stop in `tranzit_nearest_stop_distance_meters`.
pub fn record_nearest_stop_distance(meters: f64) {
    metrics::histogram!("tranzit_nearest_stop_distance_meters").record(meters);
}

//! Health check handlers for Kubernetes probes.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for Kubernetes liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator: "ok" or "not_ready: <reason>".
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Transit data source in use (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Default agency served (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            source: None,
            agency_id: None,
        }
    }

    pub fn ready(service: &str, version: &str, source: &str, agency_id: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            source: Some(source.to_string()),
            agency_id: Some(agency_id.to_string()),
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {}", reason),
            service: service.to_string(),
            version: version.to_string(),
            source: None,
            agency_id: None,
        }
    }
}

/// Liveness probe handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"tranzit-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness probe handler.
///
/// The state only exists once its source opened, so readiness reduces to
/// checking that an agency is configured. Upstream availability is not
/// probed; a failing provider surfaces as 502 on the API routes.
///
/// ```text
/// GET /health/ready
/// {"status":"ok","service":"tranzit-service-shared","version":"0.1.0","source":"tranzy","agency_id":"1"}
/// ```
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let agency_id = state.default_agency();
    if agency_id.trim().is_empty() {
        let status = HealthStatus::not_ready(service, version, "no default agency configured");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let status = HealthStatus::ready(service, version, state.source().name(), agency_id);
    (StatusCode::OK, Json(status)).into_response()
}

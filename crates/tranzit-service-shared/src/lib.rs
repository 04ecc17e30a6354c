//! Shared infrastructure for Tranzit HTTP microservices.
//!
//! - [`AppState`]: transit data source, finder and default agency
//! - [`health`]: liveness and readiness handlers
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`ServiceResponse`]: success wrapper with content type
//! - [`metrics`]: Prometheus recorder and business counters
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request ids and HTTP metrics
//! - Request types with validation for each endpoint
//!
//! # Architecture
//!
//! Handlers stay thin; planning and lookups live in `tranzit-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse JSON body or query string                          │
//! │  - Validate parameters                                      │
//! │  - Call tranzit-lib on a blocking thread                    │
//! │  - Format response or problem details                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! [`test_utils`] provides a snapshot-backed state for handler tests. Enable
//! the `test-utils` feature to use it from the service crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, service_name, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_nearest_stop_distance, record_nearest_stop_query,
    record_polyline_points, record_route_failed, record_route_found, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR, PROBLEM_INVALID_REQUEST,
    PROBLEM_NO_STOPS, PROBLEM_ROUTE_NOT_FOUND, PROBLEM_UNKNOWN_STOP, PROBLEM_UPSTREAM_UNAVAILABLE,
};
pub use request::{NearestStopRequest, RouteRequest, Validate};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};

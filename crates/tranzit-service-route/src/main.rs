//! Tranzit direct route HTTP microservice.
//!
//! Finds a single trip that serves two stops in travel order and returns the
//! trip, its route and the shape segment between the stops.
//!
//! # Endpoints
//!
//! - `POST /api/v1/route` - Plan a direct route from a JSON body
//! - `GET /api/v1/generate_route` - Plan a direct route from query parameters
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `TRANZY_API_KEY` - API key for the live transit feed
//! - `TRANZY_AGENCY_ID` - Agency used when requests omit one (default: 1)
//! - `TRANZIT_SNAPSHOT_PATH` - Serve from a JSON snapshot instead of the API
//! - `TRANZIT_PROXIMITY_METERS` - Stop-to-shape threshold (default: 20)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_PORT` - HTTP port (default: 8080)

use std::env;
use std::net::SocketAddr;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use tranzit_lib::{DirectRoutePlan, Error as LibError, TransitConfig, plan_direct_route};
use tranzit_service_shared::{
    AppState, LoggingConfig, MetricsConfig, MetricsLayer, ProblemDetails, RequestId,
    RouteRequest, ServiceResponse, Validate, from_lib_error, health_live, health_ready,
    init_logging, init_metrics, metrics_handler, record_polyline_points, record_route_failed,
    record_route_found,
};

const SERVICE: &str = "route";

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(ServiceResponse<DirectRoutePlan>),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service(SERVICE);
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        // Metrics are optional.
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = TransitConfig::from_env();
    info!(
        port = port,
        agency_id = %config.agency_id,
        base_url = %config.base_url,
        snapshot = ?config.snapshot_path,
        "starting route service"
    );

    // Opening the live client builds a blocking HTTP client.
    let state = tokio::task::spawn_blocking(move || AppState::from_config(config))
        .await?
        .map_err(|e| {
            error!(error = %e, "failed to initialize application state");
            e
        })?;

    let app = router(state, &metrics_config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState, metrics_config: &MetricsConfig) -> Router {
    let mut app = Router::new()
        .route("/api/v1/route", post(route_handler))
        .route("/api/v1/generate_route", get(generate_route_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready));

    if metrics_config.enabled {
        app = app.route(&metrics_config.path, get(metrics_handler));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle POST /api/v1/route requests.
async fn route_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => plan(state, request_id, request).await,
        Err(rejection) => {
            record_route_failed("validation_error", SERVICE);
            Response::Error(ProblemDetails::bad_request(
                rejection.body_text(),
                request_id.as_str(),
            ))
        }
    }
}

/// Handle GET /api/v1/generate_route requests.
async fn generate_route_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<RouteRequest>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(request)) => plan(state, request_id, request).await,
        Err(rejection) => {
            record_route_failed("validation_error", SERVICE);
            Response::Error(ProblemDetails::bad_request(
                rejection.body_text(),
                request_id.as_str(),
            ))
        }
    }
}

async fn plan(state: AppState, request_id: RequestId, request: RouteRequest) -> Response {
    info!(
        request_id = %request_id,
        starting_stop_id = ?request.starting_stop_id,
        destination_stop_id = ?request.destination_stop_id,
        agency_id = ?request.agency_id,
        "handling route request"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error", SERVICE);
        return Response::Error(*problem);
    }

    let agency_id = state.agency_or_default(request.agency_id.as_deref());
    let lib_request = request.to_lib_request(&agency_id);
    let source = state.source();
    let finder = state.finder();

    let outcome = tokio::task::spawn_blocking(move || {
        plan_direct_route(source.as_ref(), &lib_request, &finder)
    })
    .await;

    let plan = match outcome {
        Ok(Ok(plan)) => plan,
        Ok(Err(e)) => {
            let reason = failure_reason(&e);
            if e.is_upstream_unavailable() {
                error!(request_id = %request_id, error = %e, "transit data provider failed");
            } else {
                info!(request_id = %request_id, reason = reason, error = %e, "no direct route");
            }
            record_route_failed(reason, SERVICE);
            return Response::Error(from_lib_error(&e, request_id.as_str()));
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "route planning task failed");
            record_route_failed("internal_error", SERVICE);
            return Response::Error(ProblemDetails::internal_error(
                "route planning did not complete",
                request_id.as_str(),
            ));
        }
    };

    record_route_found(SERVICE);
    record_polyline_points(plan.point_count());

    info!(
        request_id = %request_id,
        trip_id = ?plan.trip.trip_id,
        route_id = ?plan.route.route_id,
        points = plan.point_count(),
        "direct route found"
    );

    Response::Success(ServiceResponse::new(plan))
}

fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::RouteNotFound { .. } => "not_found",
        LibError::UnknownStop { .. } => "unknown_stop",
        e if e.is_invalid_input() => "validation_error",
        e if e.is_upstream_unavailable() => "upstream",
        _ => "internal_error",
    }
}

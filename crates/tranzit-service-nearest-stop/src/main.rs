//! Tranzit nearest-stop HTTP microservice.
//!
//! Returns the agency stop closest to a coordinate by geodesic distance.
//!
//! # Endpoints
//!
//! - `POST /api/v1/stops/nearest` - Nearest stop from a JSON body
//! - `GET /api/v1/nearest_stop` - Nearest stop from `lat`/`lon` query parameters
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness probe
//! - `GET /health/ready` - Kubernetes readiness probe
//!
//! # Configuration
//!
//! - `TRANZY_API_KEY` - API key for the live transit feed
//! - `TRANZY_AGENCY_ID` - Agency used when requests omit one (default: 1)
//! - `TRANZIT_SNAPSHOT_PATH` - Serve from a JSON snapshot instead of the API
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

use tranzit_lib::{NearestStop, TransitConfig, find_nearest_stop};
use tranzit_service_shared::{
    AppState, LoggingConfig, MetricsConfig, MetricsLayer, NearestStopRequest, ProblemDetails,
    RequestId, ServiceResponse, from_lib_error, health_live, health_ready, init_logging,
    init_metrics, metrics_handler, record_nearest_stop_distance, record_nearest_stop_query,
};

const SERVICE: &str = "nearest-stop";

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(ServiceResponse<NearestStop>),
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
        snapshot = ?config.snapshot_path,
        "starting nearest-stop service"
    );

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
        .route("/api/v1/stops/nearest", post(nearest_stop_handler))
        .route("/api/v1/nearest_stop", get(nearest_stop_query_handler))
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

/// Handle POST /api/v1/stops/nearest requests.
async fn nearest_stop_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<NearestStopRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(request)) => nearest(state, request_id, request).await,
        Err(rejection) => rejected(&request_id, rejection.body_text()),
    }
}

/// Handle GET /api/v1/nearest_stop requests.
async fn nearest_stop_query_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<NearestStopRequest>, QueryRejection>,
) -> Response {
    match query {
        Ok(Query(request)) => nearest(state, request_id, request).await,
        Err(rejection) => rejected(&request_id, rejection.body_text()),
    }
}

fn rejected(request_id: &RequestId, detail: String) -> Response {
    record_nearest_stop_query("validation_error", SERVICE);
    Response::Error(ProblemDetails::bad_request(detail, request_id.as_str()))
}

async fn nearest(state: AppState, request_id: RequestId, request: NearestStopRequest) -> Response {
    info!(
        request_id = %request_id,
        lat = ?request.lat,
        lon = ?request.lon,
        agency_id = ?request.agency_id,
        "handling nearest stop request"
    );

    let point = match request.query_point(request_id.as_str()) {
        Ok(point) => point,
        Err(problem) => {
            record_nearest_stop_query("validation_error", SERVICE);
            return Response::Error(*problem);
        }
    };

    let agency_id = state.agency_or_default(request.agency_id.as_deref());
    let source = state.source();
    let lookup_agency = agency_id.clone();

    let outcome =
        tokio::task::spawn_blocking(move || find_nearest_stop(source.as_ref(), &lookup_agency, point))
            .await;

    let nearest = match outcome {
        Ok(Ok(nearest)) => nearest,
        Ok(Err(e)) => {
            let outcome = if e.is_upstream_unavailable() {
                error!(request_id = %request_id, error = %e, "transit data provider failed");
                "upstream"
            } else if e.is_not_found() {
                info!(request_id = %request_id, agency_id = %agency_id, "agency has no stops");
                "no_stops"
            } else {
                warn!(request_id = %request_id, error = %e, "nearest stop lookup failed");
                "validation_error"
            };
            record_nearest_stop_query(outcome, SERVICE);
            return Response::Error(from_lib_error(&e, request_id.as_str()));
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "nearest stop task failed");
            record_nearest_stop_query("internal_error", SERVICE);
            return Response::Error(ProblemDetails::internal_error(
                "nearest stop lookup did not complete",
                request_id.as_str(),
            ));
        }
    };

    record_nearest_stop_query("found", SERVICE);
    record_nearest_stop_distance(nearest.distance_meters);

    info!(
        request_id = %request_id,
        stop_id = %nearest.stop.stop_id,
        distance_meters = nearest.distance_meters,
        "nearest stop found"
    );

    Response::Success(ServiceResponse::new(nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use tranzit_lib::TransitSnapshot;
    use tranzit_service_shared::test_utils::{fixture_stops, test_state};

    fn server() -> TestServer {
        TestServer::new(router(test_state(), &MetricsConfig::default())).unwrap()
    }

    #[tokio::test]
    async fn post_returns_closest_stop() {
        let response = server()
            .post("/api/v1/stops/nearest")
            .json(&json!({"lat": 44.4268, "lon": 26.1025}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["stop"]["stop_id"], fixture_stops::PIATA_ROMANA);
        assert_eq!(body["stop"]["stop_name"], "Piata Romana");
        assert!(body["distance_meters"].as_f64().unwrap() < 1.0);
        assert_eq!(body["content_type"], "application/json");
    }

    #[tokio::test]
    async fn get_reads_query_parameters() {
        let response = server()
            .get("/api/v1/nearest_stop")
            .add_query_param("lat", 44.449)
            .add_query_param("lon", 26.149)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["stop"]["stop_id"], fixture_stops::VATRA_LUMINOASA);
        let distance = body["distance_meters"].as_f64().unwrap();
        assert!(distance > 100.0 && distance < 200.0, "distance was {distance}");
    }

    #[tokio::test]
    async fn missing_coordinate_is_invalid_request() {
        let response = server()
            .get("/api/v1/nearest_stop")
            .add_query_param("lat", 44.4)
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.header("content-type"), "application/problem+json");
        let body: Value = response.json();
        assert_eq!(body["type"], "/problems/invalid-request");
    }

    #[tokio::test]
    async fn body_without_coordinates_names_both_fields() {
        let response = server()
            .post("/api/v1/stops/nearest")
            .add_header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("nearest-empty"),
            )
            .json(&json!({"agency_id": "1"}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Both 'lat' and 'lon' are required");
        assert_eq!(body["instance"], "nearest-empty");
    }

    #[tokio::test]
    async fn non_numeric_coordinate_is_invalid_request() {
        let response = server()
            .get("/api/v1/nearest_stop?lat=north&lon=26.1")
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["type"], "/problems/invalid-request");
    }

    #[tokio::test]
    async fn out_of_range_latitude_is_invalid_request() {
        let response = server()
            .post("/api/v1/stops/nearest")
            .json(&json!({"lat": 120.0, "lon": 26.1}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("'lat'"));
    }

    #[tokio::test]
    async fn empty_catalog_is_not_found() {
        let state = AppState::from_source(
            Arc::new(TransitSnapshot::default()),
            TransitConfig::default().with_agency("7"),
        )
        .unwrap();
        let server = TestServer::new(router(state, &MetricsConfig::default())).unwrap();

        let response = server
            .post("/api/v1/stops/nearest")
            .json(&json!({"lat": 44.4, "lon": 26.1}))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["type"], "/problems/no-stops");
        assert!(body["detail"].as_str().unwrap().contains("'7'"));
    }

    #[tokio::test]
    async fn metrics_route_is_absent_when_disabled() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        let server = TestServer::new(router(test_state(), &config)).unwrap();

        server
            .get("/metrics")
            .expect_failure()
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

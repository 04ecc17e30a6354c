//! Success body shared by the route and nearest-stop services.
//!
//! Payload fields are flattened to the top level of the JSON body, so a plan
//! serialises as `{type, trip, route, polyline, content_type}` rather than
//! nesting under a `data` key. The extra `content_type` field mirrors the
//! media type that [`ProblemDetails`](crate::ProblemDetails) bodies advertise.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Media type advertised by every success body.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Successful response carrying a flattened payload.
///
/// # Example
///
/// ```
/// use tranzit_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct StopResult {
///     stop_id: String,
///     distance_meters: f64,
/// }
///
/// let result = StopResult { stop_id: "4587".to_string(), distance_meters: 41.2 };
/// let response = ServiceResponse::new(result);
/// assert_eq!(response.content_type, "application/json");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    #[serde(flatten)]
    pub data: T,

    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: JSON_CONTENT_TYPE.to_string(),
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};
    use tranzit_lib::{Coordinates, NearestStop, Stop};

    fn nearest() -> NearestStop {
        NearestStop {
            stop: Stop {
                stop_id: "4587".to_string(),
                stop_lat: Some(44.4268),
                stop_lon: Some(26.1025),
                stop_name: Some("Piata Romana".to_string()),
                stop_code: None,
            },
            distance_meters: 12.5,
        }
    }

    #[test]
    fn test_nearest_stop_body_is_flattened() {
        let value = serde_json::to_value(ServiceResponse::new(nearest())).unwrap();

        assert_eq!(value["stop"]["stop_id"], "4587");
        assert_eq!(value["distance_meters"], 12.5);
        assert_eq!(value["content_type"], "application/json");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_type_tag_survives_flattening() {
        #[derive(Serialize)]
        struct PlanBody {
            #[serde(rename = "type")]
            kind: &'static str,
            polyline: Vec<[f64; 2]>,
        }

        let body = PlanBody {
            kind: "direct",
            polyline: vec![Coordinates::new(44.4268, 26.1025).as_pair()],
        };
        let value = serde_json::to_value(ServiceResponse::new(body)).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "direct",
                "polyline": [[44.4268, 26.1025]],
                "content_type": "application/json"
            })
        );
    }

    #[test]
    fn test_into_response_is_ok_json() {
        let response = ServiceResponse::new(nearest()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_client_can_read_body_back() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Distance {
            distance_meters: f64,
        }

        let body: Value = json!({"distance_meters": 40.0, "content_type": "application/json"});
        let response: ServiceResponse<Distance> = serde_json::from_value(body).unwrap();
        assert_eq!(response.data, Distance { distance_meters: 40.0 });
        assert_eq!(response.content_type, JSON_CONTENT_TYPE);
    }
}

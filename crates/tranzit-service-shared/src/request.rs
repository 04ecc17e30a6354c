//! Request types and validation for HTTP endpoints.
//!
//! The same types back the JSON bodies of the POST endpoints and the query
//! strings of the GET endpoints. Stop ids are accepted as strings or as JSON
//! numbers, since the provider publishes them as integers.

use serde::{Deserialize, Deserializer, Serialize};

use tranzit_lib::{Coordinates, DirectRouteRequest};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.map(|id| match id {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    }))
}

fn require_id(
    value: &Option<String>,
    field: &str,
    request_id: &str,
) -> Result<(), Box<ProblemDetails>> {
    match value.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(()),
        _ => Err(Box::new(ProblemDetails::bad_request(
            format!("The '{}' field is required and cannot be empty", field),
            request_id,
        ))),
    }
}

/// Request for a direct route between two stops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Boarding stop id.
    #[serde(default, deserialize_with = "flexible_id")]
    pub starting_stop_id: Option<String>,

    /// Alighting stop id.
    #[serde(default, deserialize_with = "flexible_id")]
    pub destination_stop_id: Option<String>,

    /// Agency to query; the service default when absent.
    #[serde(
        default,
        deserialize_with = "flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub agency_id: Option<String>,
}

impl RouteRequest {
    pub fn new(starting_stop_id: impl Into<String>, destination_stop_id: impl Into<String>) -> Self {
        Self {
            starting_stop_id: Some(starting_stop_id.into()),
            destination_stop_id: Some(destination_stop_id.into()),
            agency_id: None,
        }
    }

    pub fn with_agency(mut self, agency_id: impl Into<String>) -> Self {
        self.agency_id = Some(agency_id.into());
        self
    }

    /// Convert into the library request once validated.
    ///
    /// Missing ids become empty strings, which the planner rejects as
    /// invalid input, so skipping validation cannot produce a bogus plan.
    pub fn to_lib_request(&self, agency_id: &str) -> DirectRouteRequest {
        DirectRouteRequest::new(
            self.starting_stop_id.as_deref().unwrap_or_default().trim(),
            self.destination_stop_id.as_deref().unwrap_or_default().trim(),
            agency_id,
        )
    }
}

impl Validate for RouteRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        require_id(&self.starting_stop_id, "starting_stop_id", request_id)?;
        require_id(&self.destination_stop_id, "destination_stop_id", request_id)?;
        Ok(())
    }
}

/// Request for the stop closest to a coordinate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearestStopRequest {
    /// Latitude in decimal degrees.
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    pub lon: Option<f64>,

    #[serde(
        default,
        deserialize_with = "flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub agency_id: Option<String>,
}

impl NearestStopRequest {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            agency_id: None,
        }
    }

    /// Validate both coordinates and return the query point.
    pub fn query_point(&self, request_id: &str) -> Result<Coordinates, Box<ProblemDetails>> {
        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(Box::new(ProblemDetails::bad_request(
                "Both 'lat' and 'lon' are required",
                request_id,
            )));
        };

        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'lat' field must be between -90 and 90",
                request_id,
            )));
        }

        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'lon' field must be between -180 and 180",
                request_id,
            )));
        }

        Ok(Coordinates::new(lat, lon))
    }
}

impl Validate for NearestStopRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        self.query_point(request_id).map(|_| ())
    }
}

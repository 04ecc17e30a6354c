// Test-only helpers for `tranzit-lib` tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::{Route, ShapePoint, Stop, Trip};
use crate::source::TransitSource;

pub fn stop(id: &str, lat: f64, lon: f64) -> Stop {
    Stop {
        stop_id: id.to_string(),
        stop_lat: Some(lat),
        stop_lon: Some(lon),
        stop_name: Some(format!("Stop {id}")),
        stop_code: None,
    }
}

pub fn trip(id: &str, route_id: &str, shape_id: Option<&str>) -> Trip {
    Trip {
        trip_id: Some(id.to_string()),
        route_id: Some(route_id.to_string()),
        shape_id: shape_id.map(str::to_string),
        trip_headsign: None,
        direction_id: None,
        block_id: None,
        service_id: None,
    }
}

pub fn route(id: &str, short: &str, long: &str) -> Route {
    Route {
        route_id: id.to_string(),
        route_short_name: Some(short.to_string()),
        route_long_name: Some(long.to_string()),
        route_type: None,
        route_color: None,
        route_text_color: None,
        route_desc: None,
    }
}

fn unavailable(resource: &str) -> Error {
    Error::UpstreamStatus {
        status: 503,
        url: format!("fake://{resource}"),
    }
}

/// In-memory source whose collections can be made to fail individually.
#[derive(Default)]
pub struct FakeSource {
    pub stops: Vec<Stop>,
    pub trips: Vec<Trip>,
    pub routes: Vec<Route>,
    pub shapes: HashMap<String, Vec<ShapePoint>>,
    pub fail_stops: bool,
    pub fail_trips: bool,
    pub fail_routes: bool,
    pub failing_shapes: Vec<String>,
    pub shape_requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_shape(mut self, shape_id: &str, points: Vec<ShapePoint>) -> Self {
        self.shapes.insert(shape_id.to_string(), points);
        self
    }

    pub fn requested_shapes(&self) -> Vec<String> {
        self.shape_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl TransitSource for FakeSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn stops(&self, _agency_id: &str) -> Result<Vec<Stop>> {
        if self.fail_stops {
            return Err(unavailable("stops"));
        }
        Ok(self.stops.clone())
    }

    fn trips(&self, _agency_id: &str) -> Result<Vec<Trip>> {
        if self.fail_trips {
            return Err(unavailable("trips"));
        }
        Ok(self.trips.clone())
    }

    fn shape(&self, _agency_id: &str, shape_id: &str) -> Result<Vec<ShapePoint>> {
        if let Ok(mut requests) = self.shape_requests.lock() {
            requests.push(shape_id.to_string());
        }
        if self.failing_shapes.iter().any(|id| id == shape_id) {
            return Err(unavailable("shapes"));
        }
        Ok(self.shapes.get(shape_id).cloned().unwrap_or_default())
    }

    fn route(&self, _agency_id: &str, route_id: &str) -> Result<Option<Route>> {
        if self.fail_routes {
            return Err(unavailable("routes"));
        }
        Ok(self.routes.iter().find(|r| r.route_id == route_id).cloned())
    }
}

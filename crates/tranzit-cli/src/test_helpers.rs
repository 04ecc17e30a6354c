// Test utilities used across `tranzit-cli` tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use tranzit_lib::{DirectRoutePlan, NearestStop, PlanKind, RouteSummary, Stop, Trip};

/// Builder for tests that constructs a `DirectRoutePlan` with sensible defaults.
pub struct PlanBuilder {
    plan: DirectRoutePlan,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            plan: DirectRoutePlan {
                kind: PlanKind::Direct,
                trip: Trip {
                    trip_id: Some("24_0".to_string()),
                    route_id: Some("24".to_string()),
                    shape_id: Some("24_0".to_string()),
                    trip_headsign: Some("Piata Iancului".to_string()),
                    direction_id: Some(0),
                    block_id: None,
                    service_id: None,
                },
                route: RouteSummary {
                    route_id: Some("24".to_string()),
                    short_name: "24".to_string(),
                    long_name: "Piata Victoriei - Vatra Luminoasa".to_string(),
                },
                polyline: vec![[44.4267, 26.1024], [44.4285, 26.106], [44.4299, 26.1099]],
            },
        }
    }

    pub fn headsign(mut self, headsign: Option<&str>) -> Self {
        self.plan.trip.trip_headsign = headsign.map(str::to_string);
        self
    }

    pub fn names(mut self, short: &str, long: &str) -> Self {
        self.plan.route.short_name = short.to_string();
        self.plan.route.long_name = long.to_string();
        self
    }

    pub fn route_id(mut self, route_id: Option<&str>) -> Self {
        self.plan.route.route_id = route_id.map(str::to_string);
        self.plan.trip.route_id = self.plan.route.route_id.clone();
        self
    }

    pub fn polyline(mut self, points: Vec<[f64; 2]>) -> Self {
        self.plan.polyline = points;
        self
    }

    pub fn build(self) -> DirectRoutePlan {
        self.plan
    }
}

pub fn nearest(stop_id: &str, name: Option<&str>, distance_meters: f64) -> NearestStop {
    NearestStop {
        stop: Stop {
            stop_id: stop_id.to_string(),
            stop_lat: Some(44.4268),
            stop_lon: Some(26.1025),
            stop_name: name.map(str::to_string),
            stop_code: None,
        },
        distance_meters,
    }
}

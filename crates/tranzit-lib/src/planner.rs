//! Direct-route planning against a [`TransitSource`].
//!
//! This module wires the pieces together:
//! - resolve both stop ids against the agency's stop catalog
//! - fetch the agency's trips
//! - run the [`DirectRouteFinder`], loading shapes lazily per trip
//! - look up the matched trip's route for display names
//!
//! # Example
//!
//! ```no_run
//! use tranzit_lib::{plan_direct_route, DirectRouteFinder, DirectRouteRequest, TransitConfig, TranzyClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TransitConfig::from_env();
//! let client = TranzyClient::new(&config)?;
//! let request = DirectRouteRequest::new("4587", "4611", &config.agency_id);
//! let plan = plan_direct_route(&client, &request, &DirectRouteFinder::default())?;
//! println!("{} points on line {}", plan.polyline.len(), plan.route.short_name);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::direct::DirectRouteFinder;
use crate::error::{Error, Result};
use crate::geodesic::Coordinates;
use crate::model::{find_stop, FeedId, Route, Stop, Trip};
use crate::shape::to_polyline;
use crate::source::TransitSource;

/// Placeholder used when route names are unavailable.
pub const UNKNOWN_ROUTE_NAME: &str = "N/A";

/// High-level direct route request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectRouteRequest {
    pub start_stop_id: String,
    pub destination_stop_id: String,
    pub agency_id: String,
}

impl DirectRouteRequest {
    pub fn new(
        start_stop_id: impl Into<String>,
        destination_stop_id: impl Into<String>,
        agency_id: impl Into<String>,
    ) -> Self {
        Self {
            start_stop_id: start_stop_id.into(),
            destination_stop_id: destination_stop_id.into(),
            agency_id: agency_id.into(),
        }
    }
}

/// Kind tag of a planned route. Only direct routes exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Direct,
}

/// Route metadata attached to a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    /// Route of the matched trip; `None` when the feed leaves it blank.
    pub route_id: Option<FeedId>,
    pub short_name: String,
    pub long_name: String,
}

impl RouteSummary {
    fn from_lookup(route_id: Option<FeedId>, route: Option<Route>) -> Self {
        let (short_name, long_name) = match route {
            Some(route) => (route.route_short_name, route.route_long_name),
            None => (None, None),
        };
        Self {
            route_id,
            short_name: short_name.unwrap_or_else(|| UNKNOWN_ROUTE_NAME.to_string()),
            long_name: long_name.unwrap_or_else(|| UNKNOWN_ROUTE_NAME.to_string()),
        }
    }
}

/// Planned direct route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectRoutePlan {
    #[serde(rename = "type")]
    pub kind: PlanKind,
    pub trip: Trip,
    pub route: RouteSummary,
    /// `[lat, lon]` pairs from the start stop to the destination stop.
    pub polyline: Vec<[f64; 2]>,
}

impl DirectRoutePlan {
    /// Number of polyline vertices in the trimmed segment.
    pub fn point_count(&self) -> usize {
        self.polyline.len()
    }
}

/// Resolve a stop id to a stop that can be located on a map.
///
/// A stop the feed publishes without coordinates is as unusable as an
/// unknown one.
fn resolve_stop<'a>(stops: &'a [Stop], stop_id: &str) -> Result<(&'a Stop, Coordinates)> {
    find_stop(stops, stop_id)
        .and_then(|stop| stop.coordinates().map(|point| (stop, point)))
        .ok_or_else(|| Error::UnknownStop {
            stop_id: stop_id.trim().to_string(),
        })
}

fn lookup_route(
    source: &dyn TransitSource,
    agency: &str,
    route_id: Option<&str>,
) -> Option<Route> {
    let route_id = route_id.filter(|id| !id.trim().is_empty())?;
    match source.route(agency, route_id) {
        Ok(route) => route,
        Err(err) => {
            warn!(route_id = %route_id, error = %err, "route lookup failed, using placeholder names");
            None
        }
    }
}

/// Plan a direct route between two stops.
///
/// # Errors
///
/// - [`Error::MissingStopId`] / [`Error::UnknownStop`] for bad stop ids
/// - [`Error::UpstreamUnavailable`] when stops or trips cannot be fetched
/// - [`Error::RouteNotFound`] when no trip serves both stops in order
///
/// A failing shape or route-metadata fetch never fails the plan: the trip is
/// skipped, or the route names fall back to `"N/A"`.
pub fn plan_direct_route(
    source: &dyn TransitSource,
    request: &DirectRouteRequest,
    finder: &DirectRouteFinder,
) -> Result<DirectRoutePlan> {
    if request.start_stop_id.trim().is_empty() {
        return Err(Error::MissingStopId { field: "starting" });
    }
    if request.destination_stop_id.trim().is_empty() {
        return Err(Error::MissingStopId {
            field: "destination",
        });
    }

    let agency = request.agency_id.as_str();
    let stops = source
        .stops(agency)
        .map_err(|err| Error::upstream("stops", err))?;
    debug!(source = source.name(), stops = stops.len(), "stops loaded");

    let (start, start_point) = resolve_stop(&stops, &request.start_stop_id)?;
    let (goal, goal_point) = resolve_stop(&stops, &request.destination_stop_id)?;

    let trips = source
        .trips(agency)
        .map_err(|err| Error::upstream("trips", err))?;
    debug!(source = source.name(), trips = trips.len(), "trips loaded");

    let found = finder.find(start_point, goal_point, &trips, |shape_id| {
        source.shape(agency, shape_id)
    });

    let Some(found) = found else {
        return Err(Error::RouteNotFound {
            start: start.stop_id.clone(),
            goal: goal.stop_id.clone(),
        });
    };

    let route_id = found.trip.route_id.clone();
    let route = lookup_route(source, agency, route_id.as_deref());

    info!(
        start = %start.stop_id,
        goal = %goal.stop_id,
        trip_id = ?found.trip.trip_id,
        route_id = ?route_id,
        points = found.segment.len(),
        "direct route planned"
    );

    Ok(DirectRoutePlan {
        kind: PlanKind::Direct,
        route: RouteSummary::from_lookup(route_id, route),
        polyline: to_polyline(&found.segment),
        trip: found.trip,
    })
}

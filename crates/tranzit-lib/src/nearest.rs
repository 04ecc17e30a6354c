//! Nearest-stop lookup by geodesic distance.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geodesic::Coordinates;
use crate::model::Stop;
use crate::source::TransitSource;

/// The closest stop to a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestStop {
    pub stop: Stop,
    pub distance_meters: f64,
}

/// Return the stop closest to `point`.
///
/// Ties keep the first stop in catalog order. Stops without coordinates are
/// skipped; `None` when no stop can be located.
pub fn nearest_stop(stops: &[Stop], point: Coordinates) -> Option<NearestStop> {
    let mut best: Option<(&Stop, f64)> = None;
    for stop in stops {
        let Some(position) = stop.coordinates() else {
            continue;
        };
        let distance = point.distance_to(&position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((stop, distance)),
        }
    }
    best.map(|(stop, distance_meters)| NearestStop {
        stop: stop.clone(),
        distance_meters,
    })
}

/// Fetch the agency's stops from `source` and return the one closest to `point`.
pub fn find_nearest_stop(
    source: &dyn TransitSource,
    agency_id: &str,
    point: Coordinates,
) -> Result<NearestStop> {
    let point = Coordinates::checked(point.latitude, point.longitude)?;
    let stops = source
        .stops(agency_id)
        .map_err(|err| Error::upstream("stops", err))?;
    nearest_stop(&stops, point).ok_or_else(|| Error::NoStopsAvailable {
        agency_id: agency_id.to_string(),
    })
}

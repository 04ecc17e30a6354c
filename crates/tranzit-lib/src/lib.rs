//! Tranzit library entry points.
//!
//! This crate exposes typed records for a transit open-data feed, providers
//! that deliver them (live API or JSON snapshot), and the direct-route and
//! nearest-stop searches built on geodesic proximity. Higher-level consumers
//! (CLI, HTTP services) should only depend on the functions exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod direct;
pub mod error;
pub mod geodesic;
pub mod model;
pub mod nearest;
pub mod planner;
pub mod shape;
pub mod snapshot;
pub mod source;
pub mod tranzy;

pub use config::TransitConfig;
pub use direct::{match_shape, DirectMatch, DirectRouteFinder, ShapeMatch, DEFAULT_PROXIMITY_METERS};
pub use error::{Error, Result};
pub use geodesic::{geodesic_distance, within, Coordinates};
pub use model::{find_stop, FeedId, Route, ShapePoint, ShapeRecord, Stop, Trip};
pub use nearest::{find_nearest_stop, nearest_stop, NearestStop};
pub use planner::{
    plan_direct_route, DirectRoutePlan, DirectRouteRequest, PlanKind, RouteSummary,
    UNKNOWN_ROUTE_NAME,
};
pub use shape::{sort_by_sequence, to_polyline};
pub use snapshot::TransitSnapshot;
pub use source::{open_source, TransitSource};
pub use tranzy::TranzyClient;

#[cfg(test)]
mod test_helpers;

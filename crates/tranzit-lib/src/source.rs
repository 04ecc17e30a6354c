//! Providers of transit data for the planner.

use crate::config::TransitConfig;
use crate::error::Result;
use crate::model::{Route, ShapePoint, Stop, Trip};
use crate::snapshot::TransitSnapshot;
use crate::tranzy::TranzyClient;

/// A provider of the four feed collections the planner consumes.
///
/// Implementations are blocking. Every call takes the agency identifier so a
/// single provider can serve several agencies of the same feed.
pub trait TransitSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// All stops for the agency.
    fn stops(&self, agency_id: &str) -> Result<Vec<Stop>>;

    /// All trips for the agency, in feed order.
    fn trips(&self, agency_id: &str) -> Result<Vec<Trip>>;

    /// Points of one shape, in whatever order the provider returns them.
    fn shape(&self, agency_id: &str, shape_id: &str) -> Result<Vec<ShapePoint>>;

    /// Route metadata, `None` when the provider has no such route.
    fn route(&self, agency_id: &str, route_id: &str) -> Result<Option<Route>>;
}

/// Open the source selected by `config`: the snapshot when a path is set,
/// the live API otherwise.
pub fn open_source(config: &TransitConfig) -> Result<Box<dyn TransitSource>> {
    match &config.snapshot_path {
        Some(path) => Ok(Box::new(TransitSnapshot::load(path)?)),
        None => Ok(Box::new(TranzyClient::new(config)?)),
    }
}

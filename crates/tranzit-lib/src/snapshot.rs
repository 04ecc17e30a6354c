//! Offline transit data loaded from a JSON snapshot.
//!
//! A snapshot is a single JSON document holding the four feed collections in
//! the same record shapes the live API returns:
//!
//! ```json
//! { "stops": [...], "trips": [...], "routes": [...], "shapes": [...] }
//! ```
//!
//! Shape records carry their `shape_id` and are grouped per shape on load.
//! Snapshots hold a single agency, so the agency argument is ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::model::{FeedId, Route, ShapePoint, ShapeRecord, Stop, Trip};
use crate::source::TransitSource;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    stops: Vec<Stop>,
    #[serde(default)]
    trips: Vec<Trip>,
    #[serde(default)]
    routes: Vec<Route>,
    #[serde(default)]
    shapes: Vec<ShapeRecord>,
}

/// In-memory [`TransitSource`] over a fixed data set.
#[derive(Debug, Clone, Default)]
pub struct TransitSnapshot {
    stops: Vec<Stop>,
    trips: Vec<Trip>,
    routes: Vec<Route>,
    shapes: HashMap<FeedId, Vec<ShapePoint>>,
}

impl TransitSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SnapshotNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path)?;
        let snapshot = Self::from_json(&bytes)?;
        info!(
            path = %path.display(),
            stops = snapshot.stops.len(),
            trips = snapshot.trips.len(),
            shapes = snapshot.shapes.len(),
            "loaded transit snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_slice(bytes)?;
        Ok(Self::from_parts(file.stops, file.trips, file.routes, file.shapes))
    }

    pub fn from_parts(
        stops: Vec<Stop>,
        trips: Vec<Trip>,
        routes: Vec<Route>,
        shapes: Vec<ShapeRecord>,
    ) -> Self {
        let mut grouped: HashMap<FeedId, Vec<ShapePoint>> = HashMap::new();
        for record in shapes {
            grouped.entry(record.shape_id).or_default().push(record.point);
        }
        Self {
            stops,
            trips,
            routes,
            shapes: grouped,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}

impl TransitSource for TransitSnapshot {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn stops(&self, _agency_id: &str) -> Result<Vec<Stop>> {
        Ok(self.stops.clone())
    }

    fn trips(&self, _agency_id: &str) -> Result<Vec<Trip>> {
        Ok(self.trips.clone())
    }

    fn shape(&self, _agency_id: &str, shape_id: &str) -> Result<Vec<ShapePoint>> {
        Ok(self.shapes.get(shape_id).cloned().unwrap_or_default())
    }

    fn route(&self, _agency_id: &str, route_id: &str) -> Result<Option<Route>> {
        Ok(self
            .routes
            .iter()
            .find(|route| route.route_id == route_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "stops": [{"stop_id": 1, "stop_lat": 44.0, "stop_lon": 26.0}],
        "trips": [{"trip_id": "t", "route_id": 7, "shape_id": "s"}],
        "routes": [{"route_id": "7", "route_short_name": "7"}],
        "shapes": [
            {"shape_id": "s", "shape_pt_lat": 44.1, "shape_pt_lon": 26.1, "shape_pt_sequence": 2},
            {"shape_id": "s", "shape_pt_lat": 44.0, "shape_pt_lon": 26.0, "shape_pt_sequence": 1}
        ]
    }"#;

    #[test]
    fn groups_shapes_and_keeps_delivery_order() {
        let snapshot = TransitSnapshot::from_json(SAMPLE.as_bytes()).unwrap();
        let points = snapshot.shape("1", "s").unwrap();
        let seqs: Vec<i64> = points.iter().map(|p| p.shape_pt_sequence).collect();
        assert_eq!(seqs, vec![2, 1]);
        assert!(snapshot.shape("1", "other").unwrap().is_empty());
    }

    #[test]
    fn numeric_ids_are_normalised() {
        let snapshot = TransitSnapshot::from_json(SAMPLE.as_bytes()).unwrap();
        assert_eq!(snapshot.stops("1").unwrap()[0].stop_id, "1");
        let route = snapshot.route("1", "7").unwrap().unwrap();
        assert_eq!(route.route_short_name.as_deref(), Some("7"));
        assert!(snapshot.route("1", "8").unwrap().is_none());
    }

    #[test]
    fn records_with_null_fields_still_load() {
        let snapshot = TransitSnapshot::from_json(
            br#"{
                "stops": [
                    {"stop_id": 1, "stop_lat": null, "stop_lon": null},
                    {"stop_id": 2, "stop_lat": 44.0, "stop_lon": 26.0}
                ],
                "trips": [{"trip_id": "t", "route_id": null, "shape_id": "s"}]
            }"#,
        )
        .unwrap();

        let stops = snapshot.stops("1").unwrap();
        assert_eq!(stops.len(), 2);
        assert!(stops[0].coordinates().is_none());
        assert!(snapshot.trips("1").unwrap()[0].route_id.is_none());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot = TransitSnapshot::from_json(b"{}").unwrap();
        assert_eq!(snapshot.stop_count(), 0);
        assert_eq!(snapshot.trip_count(), 0);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TransitSnapshot::load(Path::new("/nonexistent/feed.json")).unwrap_err();
        assert!(matches!(err, Error::SnapshotNotFound { .. }));
    }
}

//! Direct-route search over trip shapes.
//!
//! A trip is a direct route between two stops when its shape passes within the
//! proximity threshold of the start stop and, strictly later in sequence order,
//! within the threshold of the destination stop. The finder scans trips in the
//! order given and returns the first one that qualifies; there is no ranking.
//!
//! For the start stop the *earliest* matching point is kept, for the
//! destination stop the *latest*. This yields the longest destination-ward
//! segment of the qualifying trip.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::geodesic::{within, Coordinates};
use crate::model::{ShapePoint, Trip};
use crate::shape::sort_by_sequence;

/// Proximity threshold used when none is configured.
pub const DEFAULT_PROXIMITY_METERS: f64 = 20.0;

/// Indices into a sorted shape where the stops were matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMatch {
    pub start_index: usize,
    pub dest_index: usize,
}

/// The first qualifying trip and its trimmed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectMatch {
    pub trip: Trip,
    pub indices: ShapeMatch,
    /// Points `start_index..=dest_index` of the sorted shape.
    pub segment: Vec<ShapePoint>,
}

/// Locate the start and destination stops on an already sorted shape.
///
/// Returns `None` when either stop is never within `threshold_meters` or when
/// the earliest start match is not strictly before the latest destination match.
pub fn match_shape(
    points: &[ShapePoint],
    start: Coordinates,
    dest: Coordinates,
    threshold_meters: f64,
) -> Option<ShapeMatch> {
    let mut start_index = None;
    let mut dest_index = None;

    for (index, point) in points.iter().enumerate() {
        let position = point.coordinates();
        if start_index.is_none() && within(position, start, threshold_meters) {
            start_index = Some(index);
        }
        if within(position, dest, threshold_meters) {
            dest_index = Some(index);
        }
    }

    match (start_index, dest_index) {
        (Some(start_index), Some(dest_index)) if start_index < dest_index => Some(ShapeMatch {
            start_index,
            dest_index,
        }),
        _ => None,
    }
}

/// Searches trips for one that serves both stops without a transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectRouteFinder {
    threshold_meters: f64,
}

impl Default for DirectRouteFinder {
    fn default() -> Self {
        Self {
            threshold_meters: DEFAULT_PROXIMITY_METERS,
        }
    }
}

impl DirectRouteFinder {
    pub fn new(threshold_meters: f64) -> Result<Self> {
        if !threshold_meters.is_finite() || threshold_meters < 0.0 {
            return Err(Error::InvalidThreshold(threshold_meters));
        }
        Ok(Self { threshold_meters })
    }

    pub fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    /// Scan `trips` in order and return the first direct match.
    ///
    /// `load_shape` resolves a shape id to its points. Trips without a shape
    /// reference, whose shape cannot be loaded, or whose shape is empty are
    /// skipped; they never abort the search.
    pub fn find<'a, I, F>(
        &self,
        start: Coordinates,
        dest: Coordinates,
        trips: I,
        mut load_shape: F,
    ) -> Option<DirectMatch>
    where
        I: IntoIterator<Item = &'a Trip>,
        F: FnMut(&str) -> Result<Vec<ShapePoint>>,
    {
        for trip in trips {
            let Some(shape_id) = trip.shape_ref() else {
                debug!(trip_id = ?trip.trip_id, "skipping trip without shape");
                continue;
            };

            let points = match load_shape(shape_id) {
                Ok(points) if !points.is_empty() => sort_by_sequence(points),
                Ok(_) => {
                    debug!(trip_id = ?trip.trip_id, shape_id, "skipping trip with empty shape");
                    continue;
                }
                Err(err) => {
                    warn!(
                        trip_id = ?trip.trip_id,
                        shape_id,
                        error = %err,
                        "shape fetch failed, skipping trip"
                    );
                    continue;
                }
            };

            if let Some(indices) = match_shape(&points, start, dest, self.threshold_meters) {
                debug!(
                    trip_id = ?trip.trip_id,
                    shape_id,
                    start_index = indices.start_index,
                    dest_index = indices.dest_index,
                    "direct trip found"
                );
                let segment = points[indices.start_index..=indices.dest_index].to_vec();
                return Some(DirectMatch {
                    trip: trip.clone(),
                    indices,
                    segment,
                });
            }
        }

        None
    }
}

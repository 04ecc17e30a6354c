//! Geodesic distance on the WGS-84 ellipsoid.
//!
//! Stop and shape coordinates are real GPS positions, so proximity is measured
//! along the Earth's surface with Karney's geodesic algorithm rather than in the
//! plane. `geo` expects points as `(x = longitude, y = latitude)`.

use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates, rejecting values outside the valid lat/lon range.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(Error::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Geodesic distance to `other` in meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        geodesic_distance(*self, *other)
    }

    /// `[lat, lon]` pair as used in polyline output.
    pub fn as_pair(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }

    fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

/// Geodesic distance between two positions in meters.
pub fn geodesic_distance(a: Coordinates, b: Coordinates) -> f64 {
    Geodesic.distance(a.to_point(), b.to_point())
}

/// True when `a` and `b` are at most `threshold_meters` apart (inclusive).
pub fn within(a: Coordinates, b: Coordinates, threshold_meters: f64) -> bool {
    geodesic_distance(a, b) <= threshold_meters
}

//! Typed records for the transit open-data feed.
//!
//! The upstream API returns loosely typed JSON where identifiers are sometimes
//! numbers and sometimes strings. Everything is normalised here so the rest of
//! the crate only ever sees fixed-shape records.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::geodesic::Coordinates;

/// Identifier for a stop, trip, route or shape as published by the feed.
pub type FeedId = String;

/// A stop from the agency's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(deserialize_with = "deserialize_id")]
    pub stop_id: FeedId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub stop_code: Option<FeedId>,
}

impl Stop {
    /// Position of the stop, `None` when the feed omits either coordinate.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.stop_lat?, self.stop_lon?))
    }
}

/// A scheduled vehicle journey along a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub trip_id: Option<FeedId>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub route_id: Option<FeedId>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub shape_id: Option<FeedId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_headsign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_id: Option<FeedId>,
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_id: Option<FeedId>,
}

impl Trip {
    /// Shape reference, treating an empty string like an absent one.
    pub fn shape_ref(&self) -> Option<&str> {
        self.shape_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// One vertex of a trip shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapePoint {
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_dist_traveled: Option<f64>,
}

impl ShapePoint {
    pub fn new(lat: f64, lon: f64, sequence: i64) -> Self {
        Self {
            shape_pt_lat: lat,
            shape_pt_lon: lon,
            shape_pt_sequence: sequence,
            shape_dist_traveled: None,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.shape_pt_lat, self.shape_pt_lon)
    }
}

/// A shape point tagged with the shape it belongs to, as stored in snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub shape_id: FeedId,
    #[serde(flatten)]
    pub point: ShapePoint,
}

/// A transit line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(deserialize_with = "deserialize_id")]
    pub route_id: FeedId,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_desc: Option<String>,
}

/// Find a stop by identifier, comparing the normalised string form.
pub fn find_stop<'a>(stops: &'a [Stop], stop_id: &str) -> Option<&'a Stop> {
    let wanted = stop_id.trim();
    stops.iter().find(|stop| stop.stop_id == wanted)
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<FeedId, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(IdVisitor)
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<FeedId>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(OptIdVisitor)
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = FeedId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value.trim().to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(value.trim().to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if value.fract() == 0.0 && value.is_finite() {
            Ok(format!("{}", value as i64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }
}

struct OptIdVisitor;

impl<'de> Visitor<'de> for OptIdVisitor {
    type Value = Option<FeedId>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an optional string or integer identifier")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(IdVisitor).map(Some)
    }
}

//! Coordinate type and its WKT wire form
//!
//! The POI service exchanges points as well-known-text strings of the form
//! `POINT (<lon> <lat>)`. Note the longitude-first ordering on the wire,
//! the inverse of the struct's field order.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

static WKT_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*POINT\s*\(\s*(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)\s*\)\s*$").expect("valid WKT regex")
});

/// Errors parsing a coordinate from text
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Invalid POINT format: {0}")]
    InvalidWkt(String),

    #[error("Invalid coordinate '{0}', expected 'lat,lon'")]
    InvalidPair(String),
}

/// A (latitude, longitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Parse the `POINT (<lon> <lat>)` wire form
    pub fn from_wkt(text: &str) -> Result<Self, CoordinateError> {
        debug!(%text, "Coordinate::from_wkt: called");
        let caps = WKT_POINT
            .captures(text)
            .ok_or_else(|| CoordinateError::InvalidWkt(text.to_string()))?;

        let longitude = caps[1]
            .parse::<f64>()
            .map_err(|_| CoordinateError::InvalidWkt(text.to_string()))?;
        let latitude = caps[2]
            .parse::<f64>()
            .map_err(|_| CoordinateError::InvalidWkt(text.to_string()))?;

        Ok(Self { latitude, longitude })
    }

    /// Render the `POINT (<lon> <lat>)` wire form
    pub fn to_wkt(&self) -> String {
        format!("POINT ({} {})", self.longitude, self.latitude)
    }

    /// Straight-line distance in degree space
    ///
    /// Only used to rank points against each other, so the planar metric is enough.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Parses the CLI form `lat,lon`
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Coordinate::from_str: called");
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateError::InvalidPair(s.to_string()))?;
        let latitude = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::InvalidPair(s.to_string()))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::InvalidPair(s.to_string()))?;
        Ok(Self { latitude, longitude })
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wkt())
    }
}

struct WktVisitor;

impl Visitor<'_> for WktVisitor {
    type Value = Coordinate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a WKT string of the form 'POINT (<lon> <lat>)'")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Coordinate, E> {
        Coordinate::from_wkt(value).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(WktVisitor)
    }
}

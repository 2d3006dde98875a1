//! Routing request/response types

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Coordinate, Poi};

/// Role of a waypoint in a routing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    Start,
    Via,
    End,
}

/// A coordinate tagged with its role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub coordinate: Coordinate,
    pub kind: WaypointKind,
}

/// Build the ordered waypoint list: optional location first, then the POIs in order
///
/// The first point is tagged `Start`, the last `End`, everything between `Via`.
pub fn build_waypoints(location: Option<Coordinate>, pois: &[Poi]) -> Vec<Waypoint> {
    debug!(has_location = location.is_some(), poi_count = pois.len(), "build_waypoints: called");
    let coordinates: Vec<Coordinate> = location.into_iter().chain(pois.iter().map(|p| p.coordinate)).collect();
    let last = coordinates.len().saturating_sub(1);

    coordinates
        .into_iter()
        .enumerate()
        .map(|(i, coordinate)| {
            let kind = match i {
                0 => WaypointKind::Start,
                i if i == last => WaypointKind::End,
                _ => WaypointKind::Via,
            };
            Waypoint { coordinate, kind }
        })
        .collect()
}

/// Travel mode; the planner only ever walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Pedestrian,
}

/// Routing options; fitness flags are passed through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    pub mode: TravelMode,
    pub avoid_steep: bool,
    pub avoid_stairs: bool,
}

/// One edge of a computed path between two consecutive waypoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Human readable duration, e.g. "12 min"
    pub duration: String,
    /// Walking distance in meters, as text
    pub walking_distance: String,
}

impl Leg {
    pub fn new(duration: impl Into<String>, walking_distance: impl Into<String>) -> Self {
        Self {
            duration: duration.into(),
            walking_distance: walking_distance.into(),
        }
    }
}

/// A computed path: the drawn geometry and its per-leg breakdown
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoutedPath {
    pub geometry: Vec<Coordinate>,
    pub legs: Vec<Leg>,
}

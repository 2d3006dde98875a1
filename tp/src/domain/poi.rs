//! Point of interest records and the walking-time budget

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Coordinate;

/// Lower bound of the walking budget, in minutes
pub const MIN_WALKING_MINUTES: u32 = 30;

/// Upper bound of the walking budget, in minutes
pub const MAX_WALKING_MINUTES: u32 = 480;

/// Default walking budget, in minutes
pub const DEFAULT_WALKING_MINUTES: u32 = 120;

/// A place returned by the POI service
///
/// Position in the returned list is the visiting order. `time` and
/// `distance` are filled in from the computed route's legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
}

impl Poi {
    /// Create a POI with only the required fields set
    pub fn new(id: i64, title: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            address: String::new(),
            coordinate,
            category_id: String::new(),
            url: String::new(),
            time: None,
            distance: None,
        }
    }
}

/// Walking-time budget, stored as minutes and always within bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WalkingBudget(u32);

impl WalkingBudget {
    /// Clamp `minutes` into the supported range
    pub fn from_minutes(minutes: u32) -> Self {
        let clamped = minutes.clamp(MIN_WALKING_MINUTES, MAX_WALKING_MINUTES);
        if clamped != minutes {
            debug!(minutes, clamped, "WalkingBudget::from_minutes: clamped");
        }
        Self(clamped)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_hours(&self) -> f32 {
        self.0 as f32 / 60.0
    }
}

impl Default for WalkingBudget {
    fn default() -> Self {
        Self(DEFAULT_WALKING_MINUTES)
    }
}

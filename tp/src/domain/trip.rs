//! TripState - the single source of truth for planning and route data
//!
//! Owned by the planner actor; observers only ever see cloned snapshots.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Coordinate, InterestCategory, Poi, WalkingBudget};

/// Which view the trip is in
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TripMode {
    /// Choosing interests and budget
    #[default]
    Planner,
    /// Walking a built route; `route_id` is the first POI's id
    Timeline { route_id: String },
}

/// Where the trip lifecycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripPhase {
    #[default]
    Idle,
    Validating,
    FetchingPois,
    RequestingRoute,
    RouteReady,
    Error,
}

impl fmt::Display for TripPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::FetchingPois => "fetching_pois",
            Self::RequestingRoute => "requesting_route",
            Self::RouteReady => "route_ready",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A request to move the camera to a coordinate
///
/// `trigger` changes on every focus so that focusing the same place twice
/// is still observable as a new event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusCoordinate {
    pub coordinate: Coordinate,
    pub trigger: i64,
}

/// Issues strictly increasing millisecond stamps for focus triggers
#[derive(Debug, Default)]
pub struct TriggerClock {
    last: i64,
}

impl TriggerClock {
    /// Wall-clock millis, bumped past the previous stamp when needed
    pub fn next(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Complete trip state, published to observers on every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripState {
    pub mode: TripMode,
    pub phase: TripPhase,
    pub selected_interests: BTreeSet<InterestCategory>,
    pub walking_budget: WalkingBudget,
    pub use_location: bool,
    pub pois: Vec<Poi>,
    pub explanation: String,
    pub path_geometry: Option<Vec<Coordinate>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub focus_coordinate: Option<FocusCoordinate>,
    pub selected_point_index: Option<usize>,
}

impl Default for TripState {
    fn default() -> Self {
        Self {
            mode: TripMode::Planner,
            phase: TripPhase::Idle,
            selected_interests: BTreeSet::new(),
            walking_budget: WalkingBudget::default(),
            use_location: true,
            pois: Vec::new(),
            explanation: String::new(),
            path_geometry: None,
            is_loading: false,
            error: None,
            focus_coordinate: None,
            selected_point_index: None,
        }
    }
}

impl TripState {
    /// Initial state with a configured budget and location preference
    pub fn with_defaults(walking_budget: WalkingBudget, use_location: bool) -> Self {
        Self {
            walking_budget,
            use_location,
            ..Self::default()
        }
    }

    /// Interest tags in a stable order, as sent to the POI service
    pub fn interest_tags(&self) -> Vec<String> {
        self.selected_interests.iter().map(|c| c.tag().to_string()).collect()
    }

    pub fn has_route(&self) -> bool {
        self.path_geometry.is_some()
    }

    /// Drop every piece of trip data, keeping the user's planning inputs
    pub fn reset_trip(&mut self) {
        debug!("TripState::reset_trip: called");
        self.pois.clear();
        self.explanation.clear();
        self.path_geometry = None;
        self.focus_coordinate = None;
        self.selected_point_index = None;
        self.is_loading = false;
        self.mode = TripMode::Planner;
        self.phase = TripPhase::Idle;
    }

    /// Check the structural invariants, describing the first violation
    pub fn check_invariants(&self) -> Result<(), String> {
        if let TripMode::Timeline { route_id } = &self.mode {
            let Some(first) = self.pois.first() else {
                return Err("timeline mode with no POIs".to_string());
            };
            if *route_id != first.id.to_string() {
                return Err(format!("timeline route id {} is not first POI {}", route_id, first.id));
            }
        }
        if self.path_geometry.is_some() && self.pois.is_empty() {
            return Err("path geometry present with no POIs".to_string());
        }
        if !self.is_loading && matches!(self.phase, TripPhase::FetchingPois | TripPhase::RequestingRoute) {
            return Err(format!("phase {} without loading flag", self.phase));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(id: i64) -> Poi {
        Poi::new(id, format!("poi-{}", id), Coordinate::new(id as f64, id as f64))
    }

    #[test]
    fn test_default_state() {
        let state = TripState::default();
        assert_eq!(state.mode, TripMode::Planner);
        assert_eq!(state.phase, TripPhase::Idle);
        assert!(state.selected_interests.is_empty());
        assert_eq!(state.walking_budget.minutes(), 120);
        assert!(state.use_location);
        assert!(!state.is_loading);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_interest_tags_are_unique_and_ordered() {
        let mut state = TripState::default();
        state.selected_interests.insert(InterestCategory::Coffee);
        state.selected_interests.insert(InterestCategory::History);
        state.selected_interests.insert(InterestCategory::Coffee);
        assert_eq!(state.interest_tags(), vec!["HISTORY", "COFFEE"]);
    }

    #[test]
    fn test_timeline_requires_matching_first_poi() {
        let mut state = TripState {
            mode: TripMode::Timeline {
                route_id: "1".to_string(),
            },
            ..TripState::default()
        };
        assert!(state.check_invariants().is_err());

        state.pois = vec![poi(1), poi(2)];
        assert!(state.check_invariants().is_ok());

        state.mode = TripMode::Timeline {
            route_id: "2".to_string(),
        };
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_path_requires_pois() {
        let state = TripState {
            path_geometry: Some(vec![Coordinate::new(0.0, 0.0)]),
            ..TripState::default()
        };
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_reset_trip_keeps_inputs() {
        let mut state = TripState::default();
        state.selected_interests.insert(InterestCategory::Parks);
        state.use_location = false;
        state.pois = vec![poi(1)];
        state.path_geometry = Some(vec![Coordinate::new(0.0, 0.0)]);
        state.mode = TripMode::Timeline {
            route_id: "1".to_string(),
        };
        state.is_loading = true;
        assert!(state.has_route());

        state.reset_trip();

        assert!(state.pois.is_empty());
        assert!(!state.has_route());
        assert_eq!(state.mode, TripMode::Planner);
        assert!(!state.is_loading);
        assert!(state.selected_interests.contains(&InterestCategory::Parks));
        assert!(!state.use_location);
    }

    #[test]
    fn test_trigger_clock_strictly_increases() {
        let mut clock = TriggerClock::default();
        let a = clock.next();
        let b = clock.next();
        let c = clock.next();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(TripPhase::RequestingRoute.to_string(), "requesting_route");
        assert_eq!(TripPhase::Idle.to_string(), "idle");
    }
}

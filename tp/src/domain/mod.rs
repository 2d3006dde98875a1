//! Domain types for trip planning
//!
//! - [`Coordinate`] - a (latitude, longitude) point with its WKT wire form
//! - [`InterestCategory`] - the categories a user can pick
//! - [`Poi`] / [`WalkingBudget`] - POI records and the time budget
//! - [`TripState`] - the observable state published by the planner

mod coordinate;
mod interest;
mod poi;
mod trip;

pub use coordinate::{Coordinate, CoordinateError};
pub use interest::InterestCategory;
pub use poi::{DEFAULT_WALKING_MINUTES, MAX_WALKING_MINUTES, MIN_WALKING_MINUTES, Poi, WalkingBudget};
pub use trip::{FocusCoordinate, TriggerClock, TripMode, TripPhase, TripState};

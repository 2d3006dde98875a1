//! Trip planner orchestration
//!
//! [`TripPlanner`] is the handle; the actor behind it owns [`TripState`],
//! drives the POI fetch and the routing session, and runs the live path
//! trimmer while a route is shown.
//!
//! [`TripState`]: crate::domain::TripState

mod actor;
mod error;
mod events;
mod handle;
mod messages;

pub use error::{TripError, TripErrorKind};
pub use events::{DEFAULT_EVENT_CAPACITY, PlannerEvent};
pub use handle::{PlannerServices, TripPlanner};
pub use messages::{PlannerCommand, PlannerError, PlannerResponse};

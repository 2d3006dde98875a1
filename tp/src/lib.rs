//! Trip Planner - walking trips through points of interest
//!
//! A user picks interest categories and a walking-time budget; the planner
//! fetches matching points of interest, asks a pedestrian routing service for
//! a path through them, and keeps the displayed path trimmed to the user's
//! live position.
//!
//! # Core Concepts
//!
//! - **Single Owner**: one actor owns the trip state; observers get snapshots
//! - **One Route In Flight**: a new request cancels the previous routing session
//! - **Total Operations**: failures land on the state as messages, never as errors
//!
//! # Modules
//!
//! - [`domain`] - coordinates, POIs, interests and the trip state
//! - [`poi`] - POI fetch service client
//! - [`routing`] - routing service client and session manager
//! - [`location`] - last known position sources
//! - [`trimmer`] - live path trimming
//! - [`planner`] - the orchestrating actor and its handle
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod location;
pub mod planner;
pub mod poi;
pub mod routing;
pub mod trimmer;

// Re-export commonly used types
pub use config::{Config, PlannerConfig, PoiServiceConfig, RoutingConfig};
pub use domain::{Coordinate, FocusCoordinate, InterestCategory, Poi, TripMode, TripPhase, TripState, WalkingBudget};
pub use location::{FixedLocation, LocationSource, SharedLocation};
pub use planner::{PlannerError, PlannerEvent, PlannerServices, TripError, TripErrorKind, TripPlanner};
pub use poi::{HttpPoiClient, PoiClient, PoiError, PoiRequest, PoiResponse};
pub use routing::{OsrmRoutingClient, RouteOptions, RoutedPath, RoutingError, RoutingService, RoutingSessionManager};

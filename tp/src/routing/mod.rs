//! Pedestrian routing
//!
//! - [`RoutingService`] - the external routing collaborator
//! - [`OsrmRoutingClient`] - HTTP implementation for OSRM-compatible servers
//! - [`RoutingSessionManager`] - keeps at most one request in flight

pub mod client;
mod error;
mod osrm;
mod session;
mod types;

pub use client::RoutingService;
pub use client::mock;
pub use error::RoutingError;
pub use osrm::{OsrmRoutingClient, format_distance, format_duration};
pub use session::{RoutingSessionManager, SessionId, SessionResult};
pub use types::{Leg, RouteOptions, RoutedPath, TravelMode, Waypoint, WaypointKind, build_waypoints};

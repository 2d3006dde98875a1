//! Planner lifecycle events
//!
//! Broadcast alongside state snapshots so loggers and the CLI can react to
//! transitions without diffing states.

use tokio::sync::broadcast;
use tracing::debug;

use super::TripErrorKind;

/// Default channel capacity (events)
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A lifecycle transition of the planner
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    /// A trip request passed validation and the POI fetch started
    TripRequested { request_id: u64 },
    /// POIs arrived and routing started
    PoisFetched { request_id: u64, poi_count: usize },
    /// A path is displayed
    RouteReady { route_id: u64, points: usize, legs: usize },
    /// The trip failed; the message is on the state
    TripFailed { kind: TripErrorKind, message: String },
    /// The displayed path was shortened to the live position
    PathTrimmed { route_id: u64, remaining: usize },
    /// The trip was cleared
    TripCleared,
}

impl PlannerEvent {
    /// Short name for logs
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TripRequested { .. } => "trip_requested",
            Self::PoisFetched { .. } => "pois_fetched",
            Self::RouteReady { .. } => "route_ready",
            Self::TripFailed { .. } => "trip_failed",
            Self::PathTrimmed { .. } => "path_trimmed",
            Self::TripCleared => "trip_cleared",
        }
    }
}

/// Fire-and-forget emission; no subscribers is fine
pub(crate) fn emit(tx: &broadcast::Sender<PlannerEvent>, event: PlannerEvent) {
    debug!(event_type = event.event_type(), "emit");
    let _ = tx.send(event);
}

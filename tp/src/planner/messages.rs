//! Planner messages
//!
//! Commands and responses for the actor pattern. User intents carry a reply
//! channel; completions posted back by background tasks do not.

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use super::TripError;
use crate::domain::{Coordinate, InterestCategory};
use crate::poi::PoiResponse;
use crate::routing::{SessionId, SessionResult};

/// Errors talking to the planner actor
///
/// Trip failures never show up here; they are published on the state.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Planner channel closed")]
    ChannelClosed,
}

/// Response from planner operations
pub type PlannerResponse<T> = Result<T, PlannerError>;

/// Acknowledges that an intent was applied
pub type Ack = oneshot::Sender<()>;

/// Commands sent to the planner actor
#[derive(Debug)]
pub enum PlannerCommand {
    // User intents
    UpdateSelectedInterests {
        interests: BTreeSet<InterestCategory>,
        reply: Ack,
    },
    ToggleInterest {
        interest: InterestCategory,
        reply: Ack,
    },
    UpdateWalkingTime {
        minutes: u32,
        reply: Ack,
    },
    UpdateUseLocation {
        use_location: bool,
        reply: Ack,
    },
    RequestTrip {
        reply: Ack,
    },
    ClearTrip {
        reply: Ack,
    },
    FocusOnPoi {
        index: usize,
        reply: Ack,
    },
    SelectMarker {
        index: usize,
        reply: Ack,
    },
    ReportError {
        message: String,
        expiry: Duration,
        reply: Ack,
    },
    ClearError {
        reply: Ack,
    },

    // Completions from background tasks
    PoisFetched {
        request_id: u64,
        location: Option<Coordinate>,
        result: Result<PoiResponse, TripError>,
    },
    RouteComputed {
        session_id: SessionId,
        result: SessionResult,
    },
    PathTrimmed {
        route_id: SessionId,
        geometry: Vec<Coordinate>,
    },
    ErrorExpired {
        error_id: u64,
    },

    // Teardown
    Shutdown {
        reply: Ack,
    },
}

//! TripPlanner - cloneable handle to the planner actor

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info};

use super::actor::PlannerActor;
use super::events::{DEFAULT_EVENT_CAPACITY, PlannerEvent};
use super::messages::{PlannerCommand, PlannerError, PlannerResponse};
use crate::config::PlannerConfig;
use crate::domain::{InterestCategory, TripState, WalkingBudget};
use crate::location::LocationSource;
use crate::poi::PoiClient;
use crate::routing::{RouteOptions, RoutingService};

/// Command channel capacity
const COMMAND_CAPACITY: usize = 256;

/// External collaborators the planner drives
#[derive(Clone)]
pub struct PlannerServices {
    pub poi: Arc<dyn PoiClient>,
    pub routing: Arc<dyn RoutingService>,
    pub location: Arc<dyn LocationSource>,
    pub route_options: RouteOptions,
}

/// Handle to send intents to the planner and observe its state
///
/// Every operation completes once the actor has applied it, and never fails
/// for domain reasons: trip failures show up on [`TripState::error`]. The
/// actor stops when [`TripPlanner::shutdown`] is called or every handle is
/// dropped.
#[derive(Clone)]
pub struct TripPlanner {
    tx: mpsc::Sender<PlannerCommand>,
    state_rx: watch::Receiver<TripState>,
    event_tx: broadcast::Sender<PlannerEvent>,
}

impl TripPlanner {
    /// Spawn a new planner actor; must be called inside a tokio runtime
    pub fn spawn(config: PlannerConfig, services: PlannerServices) -> Self {
        debug!(?config, "spawn: called");
        let initial = TripState::with_defaults(
            WalkingBudget::from_minutes(config.default_walking_minutes),
            config.use_location,
        );

        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        let (state_tx, state_rx) = watch::channel(initial);
        let (event_tx, _) = broadcast::channel(DEFAULT_EVENT_CAPACITY);

        let actor = PlannerActor::new(config, services, state_tx, event_tx.clone(), tx.downgrade());
        tokio::spawn(actor.run(rx));

        info!("TripPlanner spawned");
        Self { tx, state_rx, event_tx }
    }

    async fn send(&self, make: impl FnOnce(oneshot::Sender<()>) -> PlannerCommand) -> PlannerResponse<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| PlannerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| PlannerError::ChannelClosed)
    }

    // === Planning inputs ===

    /// Replace the selected interest set
    pub async fn update_selected_interests(&self, interests: BTreeSet<InterestCategory>) -> PlannerResponse<()> {
        debug!(?interests, "update_selected_interests: called");
        self.send(|reply| PlannerCommand::UpdateSelectedInterests { interests, reply })
            .await
    }

    /// Add the interest if absent, remove it if present
    pub async fn toggle_interest(&self, interest: InterestCategory) -> PlannerResponse<()> {
        debug!(%interest, "toggle_interest: called");
        self.send(|reply| PlannerCommand::ToggleInterest { interest, reply })
            .await
    }

    /// Set the walking budget; clamped into the supported range
    pub async fn update_walking_time(&self, minutes: u32) -> PlannerResponse<()> {
        debug!(minutes, "update_walking_time: called");
        self.send(|reply| PlannerCommand::UpdateWalkingTime { minutes, reply })
            .await
    }

    pub async fn update_use_location(&self, use_location: bool) -> PlannerResponse<()> {
        debug!(use_location, "update_use_location: called");
        self.send(|reply| PlannerCommand::UpdateUseLocation { use_location, reply })
            .await
    }

    // === Trip lifecycle ===

    /// Validate inputs and start fetching POIs and a route
    ///
    /// Returns once the request is accepted; watch the state for the outcome.
    pub async fn request_trip(&self) -> PlannerResponse<()> {
        debug!("request_trip: called");
        self.send(|reply| PlannerCommand::RequestTrip { reply }).await
    }

    /// Cancel outstanding work and drop the current trip
    pub async fn clear_trip(&self) -> PlannerResponse<()> {
        debug!("clear_trip: called");
        self.send(|reply| PlannerCommand::ClearTrip { reply }).await
    }

    /// Move focus to the POI at `index`; ignored when out of range
    pub async fn focus_on_poi(&self, index: usize) -> PlannerResponse<()> {
        debug!(index, "focus_on_poi: called");
        self.send(|reply| PlannerCommand::FocusOnPoi { index, reply }).await
    }

    /// Highlight a map marker
    pub async fn select_marker(&self, index: usize) -> PlannerResponse<()> {
        debug!(index, "select_marker: called");
        self.send(|reply| PlannerCommand::SelectMarker { index, reply }).await
    }

    // === Errors ===

    /// Show `message` until `expiry` elapses or a newer error replaces it
    pub async fn report_error(&self, message: impl Into<String>, expiry: Duration) -> PlannerResponse<()> {
        let message = message.into();
        debug!(%message, ?expiry, "report_error: called");
        self.send(|reply| PlannerCommand::ReportError { message, expiry, reply })
            .await
    }

    pub async fn clear_error(&self) -> PlannerResponse<()> {
        debug!("clear_error: called");
        self.send(|reply| PlannerCommand::ClearError { reply }).await
    }

    // === Observation ===

    /// Latest published state
    pub fn snapshot(&self) -> TripState {
        self.state_rx.borrow().clone()
    }

    /// Receiver that sees every published state
    pub fn subscribe(&self) -> watch::Receiver<TripState> {
        self.state_rx.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PlannerEvent> {
        self.event_tx.subscribe()
    }

    /// Wait for the first published state matching `pred`
    pub async fn wait_until<F>(&self, mut pred: F) -> PlannerResponse<TripState>
    where
        F: FnMut(&TripState) -> bool,
    {
        let mut rx = self.state_rx.clone();
        let state = rx.wait_for(|s| pred(s)).await.map_err(|_| PlannerError::ChannelClosed)?;
        Ok((*state).clone())
    }

    /// Stop the actor, cancelling every outstanding task
    pub async fn shutdown(&self) -> PlannerResponse<()> {
        debug!("shutdown: called");
        self.send(|reply| PlannerCommand::Shutdown { reply }).await
    }
}

//! PlannerActor - owns TripState and serializes every mutation
//!
//! User intents and background completions arrive on the same channel, so the
//! actor is the single logical thread of control. Background work (POI fetch,
//! routing session, path trimmer, error expiry) runs on spawned tasks that only
//! ever talk back through a weak sender.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::events::{PlannerEvent, emit};
use super::messages::PlannerCommand;
use super::{PlannerServices, TripError};
use crate::config::PlannerConfig;
use crate::domain::{
    Coordinate, FocusCoordinate, InterestCategory, Poi, TriggerClock, TripMode, TripPhase, TripState, WalkingBudget,
};
use crate::location::LocationSource;
use crate::poi::{PoiClient, PoiRequest, PoiResponse};
use crate::routing::{
    RouteOptions, RoutedPath, RoutingSessionManager, SessionId, SessionResult, build_waypoints,
};
use crate::trimmer::PathTrimmer;

/// A spawned task tagged with the id that must match when it reports back
struct Tracked {
    id: u64,
    handle: JoinHandle<()>,
}

impl Tracked {
    fn abort(self) {
        self.handle.abort();
    }
}

pub(crate) struct PlannerActor {
    state: TripState,
    state_tx: watch::Sender<TripState>,
    event_tx: broadcast::Sender<PlannerEvent>,
    self_tx: mpsc::WeakSender<PlannerCommand>,
    config: PlannerConfig,
    route_options: RouteOptions,
    poi: Arc<dyn PoiClient>,
    location: Arc<dyn LocationSource>,
    sessions: RoutingSessionManager,
    next_request_id: u64,
    fetch: Option<Tracked>,
    trimmer: Option<Tracked>,
    next_error_id: u64,
    expiry: Option<Tracked>,
    clock: TriggerClock,
}

impl PlannerActor {
    pub(crate) fn new(
        config: PlannerConfig,
        services: PlannerServices,
        state_tx: watch::Sender<TripState>,
        event_tx: broadcast::Sender<PlannerEvent>,
        self_tx: mpsc::WeakSender<PlannerCommand>,
    ) -> Self {
        let state = state_tx.borrow().clone();
        Self {
            state,
            state_tx,
            event_tx,
            self_tx,
            config,
            route_options: services.route_options,
            poi: services.poi,
            location: services.location,
            sessions: RoutingSessionManager::new(services.routing),
            next_request_id: 0,
            fetch: None,
            trimmer: None,
            next_error_id: 0,
            expiry: None,
            clock: TriggerClock::default(),
        }
    }

    /// Process commands until shutdown or until every handle is dropped
    pub(crate) async fn run(mut self, mut rx: mpsc::Receiver<PlannerCommand>) {
        debug!("run: called");
        info!("Trip planner started");

        while let Some(cmd) = rx.recv().await {
            match cmd {
                PlannerCommand::UpdateSelectedInterests { interests, reply } => {
                    debug!(?interests, "run: UpdateSelectedInterests command");
                    self.state.selected_interests = interests;
                    self.publish();
                    let _ = reply.send(());
                }

                PlannerCommand::ToggleInterest { interest, reply } => {
                    debug!(%interest, "run: ToggleInterest command");
                    self.toggle_interest(interest);
                    let _ = reply.send(());
                }

                PlannerCommand::UpdateWalkingTime { minutes, reply } => {
                    debug!(minutes, "run: UpdateWalkingTime command");
                    self.state.walking_budget = WalkingBudget::from_minutes(minutes);
                    self.publish();
                    let _ = reply.send(());
                }

                PlannerCommand::UpdateUseLocation { use_location, reply } => {
                    debug!(use_location, "run: UpdateUseLocation command");
                    self.state.use_location = use_location;
                    self.publish();
                    let _ = reply.send(());
                }

                PlannerCommand::RequestTrip { reply } => {
                    debug!("run: RequestTrip command");
                    self.request_trip();
                    let _ = reply.send(());
                }

                PlannerCommand::ClearTrip { reply } => {
                    debug!("run: ClearTrip command");
                    self.clear_trip();
                    let _ = reply.send(());
                }

                PlannerCommand::FocusOnPoi { index, reply } => {
                    debug!(index, "run: FocusOnPoi command");
                    self.focus_on_poi(index);
                    let _ = reply.send(());
                }

                PlannerCommand::SelectMarker { index, reply } => {
                    debug!(index, "run: SelectMarker command");
                    self.state.selected_point_index = Some(index);
                    self.publish();
                    let _ = reply.send(());
                }

                PlannerCommand::ReportError { message, expiry, reply } => {
                    debug!(%message, ?expiry, "run: ReportError command");
                    self.report_error(message, expiry);
                    let _ = reply.send(());
                }

                PlannerCommand::ClearError { reply } => {
                    debug!("run: ClearError command");
                    self.clear_error();
                    let _ = reply.send(());
                }

                PlannerCommand::PoisFetched {
                    request_id,
                    location,
                    result,
                } => {
                    debug!(request_id, ok = result.is_ok(), "run: PoisFetched command");
                    self.on_pois_fetched(request_id, location, result);
                }

                PlannerCommand::RouteComputed { session_id, result } => {
                    debug!(session_id, ok = result.is_ok(), "run: RouteComputed command");
                    self.on_route_computed(session_id, result);
                }

                PlannerCommand::PathTrimmed { route_id, geometry } => {
                    debug!(route_id, points = geometry.len(), "run: PathTrimmed command");
                    self.on_path_trimmed(route_id, geometry);
                }

                PlannerCommand::ErrorExpired { error_id } => {
                    debug!(error_id, "run: ErrorExpired command");
                    self.on_error_expired(error_id);
                }

                PlannerCommand::Shutdown { reply } => {
                    debug!("run: Shutdown command");
                    info!("Trip planner shutting down");
                    self.teardown();
                    let _ = reply.send(());
                    return;
                }
            }
        }

        debug!("run: all handles dropped");
        self.teardown();
        info!("Trip planner stopped");
    }

    fn publish(&mut self) {
        if let Err(violation) = self.state.check_invariants() {
            warn!(%violation, "publish: trip state invariant violated");
        }
        self.state_tx.send_replace(self.state.clone());
    }

    fn toggle_interest(&mut self, interest: InterestCategory) {
        if !self.state.selected_interests.remove(&interest) {
            self.state.selected_interests.insert(interest);
        }
        self.publish();
    }

    // === Trip lifecycle ===

    fn request_trip(&mut self) {
        debug!("request_trip: called");
        // A new request supersedes any fetch or routing still in flight
        self.cancel_pending();

        self.state.phase = TripPhase::Validating;
        if self.state.selected_interests.is_empty() {
            self.fail(TripError::NoInterests);
            return;
        }

        let location = if self.state.use_location {
            match self.location.last_known() {
                Some(here) => Some(here),
                None => {
                    self.fail(TripError::LocationUnavailable);
                    return;
                }
            }
        } else {
            None
        };

        // The trimmer lives as long as the displayed path
        self.stop_trimmer();
        self.state.reset_trip();
        self.cancel_expiry();
        self.state.error = None;
        self.state.is_loading = true;
        self.state.phase = TripPhase::FetchingPois;
        self.publish();

        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let request = PoiRequest {
            interests: self.state.interest_tags(),
            walking_time: self.state.walking_budget.as_hours(),
            user_location: location,
        };
        info!(request_id, interests = ?request.interests, has_location = location.is_some(), "Trip requested");
        emit(&self.event_tx, PlannerEvent::TripRequested { request_id });

        let handle = tokio::spawn(fetch_pois(
            Arc::clone(&self.poi),
            request,
            self.config.fetch_timeout(),
            request_id,
            location,
            self.self_tx.clone(),
        ));
        self.fetch = Some(Tracked { id: request_id, handle });
    }

    fn on_pois_fetched(&mut self, request_id: u64, location: Option<Coordinate>, result: Result<PoiResponse, TripError>) {
        match &self.fetch {
            Some(fetch) if fetch.id == request_id => self.fetch = None,
            _ => {
                debug!(request_id, "on_pois_fetched: stale request, dropping");
                return;
            }
        }

        let response = match result {
            Ok(response) if response.is_empty() => {
                self.fail(TripError::NoPois);
                return;
            }
            Ok(response) => response,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        let poi_count = response.routes.len();
        info!(request_id, poi_count, "POIs fetched");
        self.state.pois = response.routes;
        self.state.explanation = response.explanation;
        self.state.is_loading = true;
        self.state.phase = TripPhase::RequestingRoute;
        self.publish();
        emit(&self.event_tx, PlannerEvent::PoisFetched { request_id, poi_count });

        let waypoints = build_waypoints(location, &self.state.pois);
        let tx = self.self_tx.clone();
        self.sessions
            .start(waypoints, self.route_options, move |session_id, result| async move {
                if let Some(tx) = tx.upgrade() {
                    let _ = tx.send(PlannerCommand::RouteComputed { session_id, result }).await;
                }
            });
    }

    fn on_route_computed(&mut self, session_id: SessionId, result: SessionResult) {
        if !self.sessions.finish(session_id) {
            debug!(session_id, "on_route_computed: superseded session, dropping");
            return;
        }

        let path = match result {
            Ok(paths) => match paths.into_iter().next() {
                Some(path) => path,
                None => {
                    self.fail(TripError::NoPath);
                    return;
                }
            },
            Err(e) => {
                warn!(session_id, error = %e, "on_route_computed: routing failed");
                self.fail(e.into());
                return;
            }
        };

        let Some(first) = self.state.pois.first() else {
            // pois are only ever cleared together with the session
            self.fail(TripError::Unexpected("route arrived with no POIs".to_string()));
            return;
        };
        let route_id = first.id.to_string();
        let first_coordinate = first.coordinate;

        stamp_legs(&mut self.state.pois, &path);
        let points = path.geometry.len();
        let legs = path.legs.len();
        self.state.path_geometry = Some(path.geometry.clone());
        self.state.mode = TripMode::Timeline { route_id };
        self.state.focus_coordinate = Some(FocusCoordinate {
            coordinate: first_coordinate,
            trigger: self.clock.next(),
        });
        self.state.is_loading = false;
        self.state.phase = TripPhase::RouteReady;
        self.publish();

        info!(session_id, points, legs, "Route ready");
        emit(
            &self.event_tx,
            PlannerEvent::RouteReady {
                route_id: session_id,
                points,
                legs,
            },
        );

        self.start_trimmer(session_id, path.geometry);
    }

    fn on_path_trimmed(&mut self, route_id: SessionId, geometry: Vec<Coordinate>) {
        let current = matches!(&self.trimmer, Some(t) if t.id == route_id);
        if !current || self.state.path_geometry.is_none() {
            debug!(route_id, "on_path_trimmed: route no longer displayed, dropping");
            return;
        }
        let remaining = geometry.len();
        self.state.path_geometry = Some(geometry);
        self.publish();
        emit(&self.event_tx, PlannerEvent::PathTrimmed { route_id, remaining });
    }

    fn clear_trip(&mut self) {
        debug!("clear_trip: called");
        self.cancel_background();
        self.state.reset_trip();
        self.publish();
        emit(&self.event_tx, PlannerEvent::TripCleared);
    }

    fn focus_on_poi(&mut self, index: usize) {
        let Some(poi) = self.state.pois.get(index) else {
            debug!(index, poi_count = self.state.pois.len(), "focus_on_poi: index out of range");
            return;
        };
        self.state.focus_coordinate = Some(FocusCoordinate {
            coordinate: poi.coordinate,
            trigger: self.clock.next(),
        });
        self.publish();
    }

    // === Errors ===

    fn fail(&mut self, error: TripError) {
        warn!(kind = ?error.kind(), %error, "Trip failed");
        let message = error.user_message().to_string();
        emit(
            &self.event_tx,
            PlannerEvent::TripFailed {
                kind: error.kind(),
                message: message.clone(),
            },
        );
        self.report_error(message, self.config.error_expiry());
    }

    fn report_error(&mut self, message: String, expiry: Duration) {
        self.cancel_expiry();
        self.next_error_id += 1;
        let error_id = self.next_error_id;

        self.state.error = Some(message);
        self.state.is_loading = false;
        self.state.mode = TripMode::Planner;
        self.state.phase = TripPhase::Error;
        self.publish();

        let tx = self.self_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(expiry).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(PlannerCommand::ErrorExpired { error_id }).await;
            }
        });
        self.expiry = Some(Tracked { id: error_id, handle });
    }

    fn clear_error(&mut self) {
        self.cancel_expiry();
        if self.state.error.take().is_some() {
            self.publish();
        }
    }

    fn on_error_expired(&mut self, error_id: u64) {
        match &self.expiry {
            Some(expiry) if expiry.id == error_id => self.expiry = None,
            _ => {
                debug!(error_id, "on_error_expired: superseded, ignoring");
                return;
            }
        }
        debug!(error_id, "on_error_expired: clearing error");
        self.state.error = None;
        self.publish();
    }

    // === Background tasks ===

    fn start_trimmer(&mut self, route_id: SessionId, full_path: Vec<Coordinate>) {
        self.stop_trimmer();
        let trimmer = PathTrimmer::new(
            self.config.trim_interval(),
            route_id,
            full_path,
            Arc::clone(&self.location),
            self.state_tx.subscribe(),
            self.self_tx.clone(),
        );
        self.trimmer = Some(Tracked {
            id: route_id,
            handle: trimmer.spawn(),
        });
    }

    fn stop_trimmer(&mut self) {
        if let Some(trimmer) = self.trimmer.take() {
            debug!(route_id = trimmer.id, "stop_trimmer: stopping");
            trimmer.abort();
        }
    }

    fn cancel_expiry(&mut self) {
        if let Some(expiry) = self.expiry.take() {
            expiry.abort();
        }
    }

    /// Cancel the fetch, the routing session and the trimmer
    fn cancel_pending(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            debug!(request_id = fetch.id, "cancel_pending: aborting fetch");
            fetch.abort();
        }
        self.sessions.cancel();
    }

    fn cancel_background(&mut self) {
        self.cancel_pending();
        self.stop_trimmer();
    }

    fn teardown(&mut self) {
        debug!("teardown: called");
        self.cancel_background();
        self.cancel_expiry();
    }
}

/// Copy per-leg labels onto the POIs
///
/// The trailing `pois.len()` legs map onto the POIs in order, so a leading
/// approach leg from the user's location does not shift the mapping.
pub(crate) fn stamp_legs(pois: &mut [Poi], path: &RoutedPath) {
    let offset = path.legs.len() as isize - pois.len() as isize;
    if offset < 0 {
        warn!(
            legs = path.legs.len(),
            pois = pois.len(),
            "stamp_legs: fewer legs than POIs, leading POIs stay unstamped"
        );
    }
    for (i, poi) in pois.iter_mut().enumerate() {
        let index = offset + i as isize;
        if index < 0 {
            continue;
        }
        if let Some(leg) = path.legs.get(index as usize) {
            poi.time = Some(leg.duration.clone());
            poi.distance = Some(leg.walking_distance.clone());
        }
    }
}

async fn fetch_pois(
    poi: Arc<dyn PoiClient>,
    request: PoiRequest,
    timeout: Duration,
    request_id: u64,
    location: Option<Coordinate>,
    tx: mpsc::WeakSender<PlannerCommand>,
) {
    debug!(request_id, ?timeout, "fetch_pois: called");
    let outcome = tokio::time::timeout(timeout, AssertUnwindSafe(poi.fetch(request)).catch_unwind()).await;
    let result = match outcome {
        Err(_) => Err(TripError::FetchTimedOut),
        Ok(Err(_)) => Err(TripError::Unexpected("POI client panicked".to_string())),
        Ok(Ok(Err(e))) => {
            warn!(request_id, error = %e, "fetch_pois: fetch failed");
            Err(TripError::FetchFailed(e.to_string()))
        }
        Ok(Ok(Ok(response))) => Ok(response),
    };

    if let Some(tx) = tx.upgrade() {
        let _ = tx
            .send(PlannerCommand::PoisFetched {
                request_id,
                location,
                result,
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Leg;

    fn poi(id: i64) -> Poi {
        Poi::new(id, format!("poi-{}", id), Coordinate::new(id as f64, id as f64))
    }

    fn path(legs: &[(&str, &str)]) -> RoutedPath {
        RoutedPath {
            geometry: vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)],
            legs: legs.iter().map(|(d, m)| Leg::new(*d, *m)).collect(),
        }
    }

    #[test]
    fn test_stamp_legs_with_leading_approach_leg() {
        let mut pois = vec![poi(1), poi(2)];
        stamp_legs(&mut pois, &path(&[("3 min", "200"), ("5 min", "400"), ("7 min", "600")]));
        assert_eq!(pois[0].time.as_deref(), Some("5 min"));
        assert_eq!(pois[0].distance.as_deref(), Some("400"));
        assert_eq!(pois[1].time.as_deref(), Some("7 min"));
    }

    #[test]
    fn test_stamp_legs_exact_count() {
        let mut pois = vec![poi(1), poi(2)];
        stamp_legs(&mut pois, &path(&[("3 min", "200"), ("5 min", "400")]));
        assert_eq!(pois[0].time.as_deref(), Some("3 min"));
        assert_eq!(pois[1].distance.as_deref(), Some("400"));
    }

    #[test]
    fn test_stamp_legs_fewer_legs_than_pois() {
        let mut pois = vec![poi(1), poi(2), poi(3)];
        stamp_legs(&mut pois, &path(&[("3 min", "200"), ("5 min", "400")]));
        assert!(pois[0].time.is_none());
        assert_eq!(pois[1].time.as_deref(), Some("3 min"));
        assert_eq!(pois[2].time.as_deref(), Some("5 min"));

        let mut single = vec![poi(1)];
        stamp_legs(&mut single, &path(&[]));
        assert!(single[0].time.is_none());
    }
}

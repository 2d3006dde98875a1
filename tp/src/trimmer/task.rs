//! PathTrimmer - periodic task that shortens the displayed path
//!
//! Bound to one displayed route. The planner aborts it when the route goes
//! away; the task also stops on its own once it observes that the path is
//! gone or the planner has shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::trim_path;
use crate::domain::{Coordinate, TripState};
use crate::location::LocationSource;
use crate::planner::PlannerCommand;
use crate::routing::SessionId;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The path is gone or the planner is gone; the loop exits
    Stop,
    /// No location, or nothing to trim
    Unchanged,
    /// A shorter path with this many points was posted
    Trimmed(usize),
}

/// Live path trimmer for one displayed route
pub struct PathTrimmer {
    interval: Duration,
    route_id: SessionId,
    full_path: Vec<Coordinate>,
    location: Arc<dyn LocationSource>,
    state_rx: watch::Receiver<TripState>,
    planner_tx: mpsc::WeakSender<PlannerCommand>,
}

impl PathTrimmer {
    pub fn new(
        interval: Duration,
        route_id: SessionId,
        full_path: Vec<Coordinate>,
        location: Arc<dyn LocationSource>,
        state_rx: watch::Receiver<TripState>,
        planner_tx: mpsc::WeakSender<PlannerCommand>,
    ) -> Self {
        Self {
            interval,
            route_id,
            full_path,
            location,
            state_rx,
            planner_tx,
        }
    }

    /// Start the loop on its own task
    pub fn spawn(self) -> JoinHandle<()> {
        debug!(route_id = self.route_id, points = self.full_path.len(), "PathTrimmer::spawn: called");
        tokio::spawn(self.run())
    }

    /// Tick every interval until told to stop
    ///
    /// The first tick lands one full interval after start. Overrunning ticks
    /// are skipped, never queued.
    pub async fn run(self) {
        info!(route_id = self.route_id, interval_ms = self.interval.as_millis() as u64, "Path trimmer started");
        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if self.tick().await == TickOutcome::Stop {
                break;
            }
        }
        info!(route_id = self.route_id, "Path trimmer stopped");
    }

    /// One trimming pass
    pub async fn tick(&self) -> TickOutcome {
        // Read what is shown and release the borrow before any await
        let shown_len = match self.state_rx.borrow().path_geometry.as_ref() {
            Some(path) => path.len(),
            None => {
                debug!(route_id = self.route_id, "tick: path cleared");
                return TickOutcome::Stop;
            }
        };

        let Some(here) = self.location.last_known() else {
            debug!(route_id = self.route_id, "tick: no location");
            return TickOutcome::Unchanged;
        };

        let Some(trimmed) = trim_path(&self.full_path, &here, shown_len) else {
            return TickOutcome::Unchanged;
        };

        let Some(tx) = self.planner_tx.upgrade() else {
            debug!(route_id = self.route_id, "tick: planner gone");
            return TickOutcome::Stop;
        };

        let remaining = trimmed.len();
        let command = PlannerCommand::PathTrimmed {
            route_id: self.route_id,
            geometry: trimmed,
        };
        if tx.send(command).await.is_err() {
            return TickOutcome::Stop;
        }
        TickOutcome::Trimmed(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::SharedLocation;

    fn line(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| Coordinate::new(i as f64, 0.0)).collect()
    }

    fn state_with_path(path: Option<Vec<Coordinate>>) -> TripState {
        TripState {
            path_geometry: path,
            ..TripState::default()
        }
    }

    fn trimmer(
        location: &SharedLocation,
        state_rx: watch::Receiver<TripState>,
        tx: &mpsc::Sender<PlannerCommand>,
    ) -> PathTrimmer {
        PathTrimmer::new(
            Duration::from_secs(5),
            7,
            line(5),
            Arc::new(location.clone()),
            state_rx,
            tx.downgrade(),
        )
    }

    #[tokio::test]
    async fn test_tick_without_location_is_unchanged() {
        let (_state_tx, state_rx) = watch::channel(state_with_path(Some(line(5))));
        let (tx, mut rx) = mpsc::channel(8);
        let location = SharedLocation::default();

        let trimmer = trimmer(&location, state_rx, &tx);
        assert_eq!(trimmer.tick().await, TickOutcome::Unchanged);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_tick_posts_trimmed_path() {
        let (_state_tx, state_rx) = watch::channel(state_with_path(Some(line(5))));
        let (tx, mut rx) = mpsc::channel(8);
        let location = SharedLocation::new(Some(Coordinate::new(2.1, 0.0)));

        let trimmer = trimmer(&location, state_rx, &tx);
        assert_eq!(trimmer.tick().await, TickOutcome::Trimmed(3));

        match rx.try_recv().unwrap() {
            PlannerCommand::PathTrimmed { route_id, geometry } => {
                assert_eq!(route_id, 7);
                assert_eq!(geometry, line(5)[2..].to_vec());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tick_stops_when_path_cleared() {
        let (state_tx, state_rx) = watch::channel(state_with_path(Some(line(5))));
        let (tx, _rx) = mpsc::channel(8);
        let location = SharedLocation::new(Some(Coordinate::new(2.0, 0.0)));

        let trimmer = trimmer(&location, state_rx, &tx);
        state_tx.send_replace(state_with_path(None));
        assert_eq!(trimmer.tick().await, TickOutcome::Stop);
    }

    #[tokio::test]
    async fn test_tick_stops_when_planner_gone() {
        let (_state_tx, state_rx) = watch::channel(state_with_path(Some(line(5))));
        let (tx, rx) = mpsc::channel(8);
        let location = SharedLocation::new(Some(Coordinate::new(3.0, 0.0)));

        let trimmer = trimmer(&location, state_rx, &tx);
        drop(tx);
        drop(rx);
        assert_eq!(trimmer.tick().await, TickOutcome::Stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_exits_after_path_cleared() {
        let (state_tx, state_rx) = watch::channel(state_with_path(Some(line(5))));
        let (tx, _rx) = mpsc::channel(8);
        let location = SharedLocation::default();

        let handle = trimmer(&location, state_rx, &tx).spawn();
        tokio::time::sleep(Duration::from_secs(12)).await;
        assert!(!handle.is_finished());

        state_tx.send_replace(state_with_path(None));
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(handle.is_finished());
    }
}

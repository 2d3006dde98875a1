//! RoutingService trait definition

use async_trait::async_trait;

use super::{RouteOptions, RoutedPath, RoutingError, Waypoint};

/// External pedestrian routing service
///
/// Returns every path the service computed for the ordered waypoints; an
/// empty vector means no path could be built. Dropping the returned future
/// cancels the request.
#[async_trait]
pub trait RoutingService: Send + Sync {
    async fn route(&self, waypoints: Vec<Waypoint>, options: RouteOptions) -> Result<Vec<RoutedPath>, RoutingError>;
}

/// Scripted routing service for tests and offline runs
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    #[derive(Debug, Clone)]
    enum Outcome {
        Paths(Vec<RoutedPath>),
        Fail,
    }

    /// One scripted reply, optionally delivered after a delay
    #[derive(Debug, Clone)]
    pub struct MockRouteReply {
        outcome: Outcome,
        delay: Duration,
    }

    impl MockRouteReply {
        /// Reply with a single path
        pub fn path(path: RoutedPath) -> Self {
            Self {
                outcome: Outcome::Paths(vec![path]),
                delay: Duration::ZERO,
            }
        }

        /// Reply with zero paths
        pub fn no_paths() -> Self {
            Self {
                outcome: Outcome::Paths(vec![]),
                delay: Duration::ZERO,
            }
        }

        /// Reply with a service error
        pub fn error() -> Self {
            Self {
                outcome: Outcome::Fail,
                delay: Duration::ZERO,
            }
        }

        /// Deliver this reply after `delay`
        pub fn after(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    /// Mock routing service that replays scripted replies in order
    pub struct MockRoutingService {
        replies: Mutex<VecDeque<MockRouteReply>>,
        calls: Mutex<Vec<Vec<Waypoint>>>,
        call_count: AtomicUsize,
        completed: AtomicUsize,
    }

    impl MockRoutingService {
        pub fn new(replies: Vec<MockRouteReply>) -> Self {
            debug!(reply_count = %replies.len(), "MockRoutingService::new: called");
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }
        }

        /// Number of requests issued
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Number of requests that ran to completion (not cancelled)
        pub fn completed_count(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }

        /// Waypoints of every request issued
        pub fn calls(&self) -> Vec<Vec<Waypoint>> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl RoutingService for MockRoutingService {
        async fn route(
            &self,
            waypoints: Vec<Waypoint>,
            _options: RouteOptions,
        ) -> Result<Vec<RoutedPath>, RoutingError> {
            debug!(waypoint_count = waypoints.len(), "MockRoutingService::route: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(waypoints);
            }

            let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());
            let Some(reply) = reply else {
                debug!("MockRoutingService::route: no more mock replies");
                return Err(RoutingError::InvalidResponse("No more mock replies".to_string()));
            };

            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            self.completed.fetch_add(1, Ordering::SeqCst);

            match reply.outcome {
                Outcome::Paths(paths) => Ok(paths),
                Outcome::Fail => Err(RoutingError::Api {
                    status: 500,
                    message: "mock failure".to_string(),
                }),
            }
        }
    }
}

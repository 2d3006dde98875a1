//! RoutingSessionManager - at most one outstanding routing request
//!
//! Each session runs as its own tokio task. Starting a new session aborts
//! the previous one, and every delivered result carries the id of the
//! session that produced it so the receiver can drop anything stale.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{RouteOptions, RoutedPath, RoutingError, RoutingService, Waypoint};

/// Identifies one routing session
pub type SessionId = u64;

/// Result handed to a session's completion callback
pub type SessionResult = Result<Vec<RoutedPath>, RoutingError>;

struct ActiveSession {
    id: SessionId,
    handle: JoinHandle<()>,
}

/// Owns the single in-flight routing session, if any
pub struct RoutingSessionManager {
    service: Arc<dyn RoutingService>,
    next_id: SessionId,
    current: Option<ActiveSession>,
}

impl RoutingSessionManager {
    pub fn new(service: Arc<dyn RoutingService>) -> Self {
        debug!("RoutingSessionManager::new: called");
        Self {
            service,
            next_id: 0,
            current: None,
        }
    }

    /// Cancel any current session and issue a new request
    ///
    /// `on_result` runs on the session task once the service answers. It is
    /// never invoked for a session that was cancelled before the answer arrived.
    pub fn start<F, Fut>(&mut self, waypoints: Vec<Waypoint>, options: RouteOptions, on_result: F) -> SessionId
    where
        F: FnOnce(SessionId, SessionResult) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        debug!(waypoint_count = waypoints.len(), "RoutingSessionManager::start: called");
        self.cancel();

        self.next_id += 1;
        let id = self.next_id;
        let service = Arc::clone(&self.service);

        let handle = tokio::spawn(async move {
            let result = AssertUnwindSafe(service.route(waypoints, options))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(RoutingError::Internal("routing service panicked".to_string())));
            debug!(session_id = id, ok = result.is_ok(), "routing session finished");
            on_result(id, result).await;
        });

        info!(session_id = id, "Routing session started");
        self.current = Some(ActiveSession { id, handle });
        id
    }

    /// Cancel the current session; a no-op when there is none
    ///
    /// Returns whether a session was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(session) => {
                debug!(session_id = session.id, "RoutingSessionManager::cancel: aborting session");
                session.handle.abort();
                true
            }
            None => {
                debug!("RoutingSessionManager::cancel: no session");
                false
            }
        }
    }

    /// Id of the outstanding session
    pub fn current(&self) -> Option<SessionId> {
        self.current.as_ref().map(|s| s.id)
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current() == Some(id)
    }

    /// Release the handle of a session whose result has been consumed
    ///
    /// Returns false, leaving state untouched, if `id` is not the current session.
    pub fn finish(&mut self, id: SessionId) -> bool {
        if self.is_current(id) {
            debug!(session_id = id, "RoutingSessionManager::finish: session complete");
            self.current = None;
            true
        } else {
            debug!(session_id = id, "RoutingSessionManager::finish: stale session");
            false
        }
    }
}

impl Drop for RoutingSessionManager {
    fn drop(&mut self) {
        self.cancel();
    }
}

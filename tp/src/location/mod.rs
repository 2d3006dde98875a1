//! Location sources
//!
//! The planner only ever polls for the most recent known position; no
//! freshness guarantee is assumed.

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::domain::Coordinate;

/// Supplies the last known device position, if any
pub trait LocationSource: Send + Sync {
    fn last_known(&self) -> Option<Coordinate>;
}

/// A position that never changes (or is never known)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinate>);

impl LocationSource for FixedLocation {
    fn last_known(&self) -> Option<Coordinate> {
        self.0
    }
}

/// Last known position, updated by a producer and shared with the planner
///
/// Cheap to clone; all clones see the same position.
#[derive(Debug, Clone, Default)]
pub struct SharedLocation {
    inner: Arc<RwLock<Option<Coordinate>>>,
}

impl SharedLocation {
    pub fn new(initial: Option<Coordinate>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Record a new position fix
    pub fn set(&self, coordinate: Coordinate) {
        debug!(%coordinate, "SharedLocation::set: called");
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(coordinate);
        }
    }

    /// Forget the position (e.g. provider lost the fix)
    pub fn clear(&self) {
        debug!("SharedLocation::clear: called");
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

impl LocationSource for SharedLocation {
    fn last_known(&self) -> Option<Coordinate> {
        self.inner.read().ok().and_then(|guard| *guard)
    }
}

//! Trip planning error taxonomy
//!
//! Every failure inside the planner ends up as one of these, converted to a
//! user-facing message on the published state. None of them reach callers.

use thiserror::Error;

use crate::routing::RoutingError;

/// Broad class of a trip failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripErrorKind {
    /// Bad or missing input, detected before any I/O
    Validation,
    /// POI service failed or returned nothing
    Fetch,
    /// Routing service failed or returned no path
    Routing,
    /// Anything else
    Unexpected,
}

/// A failure while planning a trip
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("no interests selected")]
    NoInterests,

    #[error("location required but unavailable")]
    LocationUnavailable,

    #[error("POI fetch failed: {0}")]
    FetchFailed(String),

    #[error("POI fetch timed out")]
    FetchTimedOut,

    #[error("POI service returned no points")]
    NoPois,

    #[error("routing failed: {0}")]
    RoutingFailed(String),

    #[error("routing service returned zero paths")]
    NoPath,

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl TripError {
    pub fn kind(&self) -> TripErrorKind {
        match self {
            Self::NoInterests | Self::LocationUnavailable => TripErrorKind::Validation,
            Self::FetchFailed(_) | Self::FetchTimedOut | Self::NoPois => TripErrorKind::Fetch,
            Self::RoutingFailed(_) | Self::NoPath => TripErrorKind::Routing,
            Self::Unexpected(_) => TripErrorKind::Unexpected,
        }
    }

    /// Message shown to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoInterests => "Select at least one interest category to build a route",
            Self::LocationUnavailable => "Could not determine the current location",
            Self::FetchFailed(_) | Self::FetchTimedOut | Self::NoPois => "Could not fetch points of interest",
            Self::NoPath => "Could not build a route, check your location",
            Self::RoutingFailed(_) => "An error occurred while building the route",
            Self::Unexpected(_) => "An unexpected error occurred while planning the trip",
        }
    }
}

impl From<RoutingError> for TripError {
    fn from(e: RoutingError) -> Self {
        match e {
            RoutingError::Internal(reason) => TripError::Unexpected(reason),
            other => TripError::RoutingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(TripError::NoInterests.kind(), TripErrorKind::Validation);
        assert_eq!(TripError::LocationUnavailable.kind(), TripErrorKind::Validation);
        assert_eq!(TripError::NoPois.kind(), TripErrorKind::Fetch);
        assert_eq!(TripError::FetchTimedOut.kind(), TripErrorKind::Fetch);
        assert_eq!(TripError::NoPath.kind(), TripErrorKind::Routing);
        assert_eq!(TripError::Unexpected("x".to_string()).kind(), TripErrorKind::Unexpected);
    }

    #[test]
    fn test_zero_paths_is_distinguishable() {
        assert_ne!(
            TripError::NoPath.user_message(),
            TripError::RoutingFailed("boom".to_string()).user_message()
        );
    }

    #[test]
    fn test_from_routing_error() {
        let e: TripError = RoutingError::InvalidResponse("bad".to_string()).into();
        assert_eq!(e.kind(), TripErrorKind::Routing);

        let e: TripError = RoutingError::Internal("panicked".to_string()).into();
        assert_eq!(e.kind(), TripErrorKind::Unexpected);
    }
}

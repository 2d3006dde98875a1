//! Routing error types

use thiserror::Error;

/// Errors from the routing service
///
/// "Zero paths returned" is not an error here: the service answers with an
/// empty path list and the planner reports it separately.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Routing session failed internally: {0}")]
    Internal(String),
}

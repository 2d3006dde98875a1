//! POI service error types

use thiserror::Error;

/// Errors that can occur while fetching points of interest
#[derive(Debug, Error)]
pub enum PoiError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PoiError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            PoiError::Api { status, .. } => matches!(*status, 408 | 429) || *status >= 500,
            PoiError::Network(_) => true,
            PoiError::InvalidResponse(_) => false,
            PoiError::Json(_) => false,
        }
    }
}

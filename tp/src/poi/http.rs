//! HTTP client for the POI fetch service
//!
//! POSTs the request as JSON and retries transient failures with
//! exponential backoff.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{PoiClient, PoiError, PoiRequest, PoiResponse};
use crate::config::PoiServiceConfig;
use crate::domain::Poi;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 500;

/// Older service builds return a bare array instead of the wrapped object
#[derive(Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Wrapped(PoiResponse),
    Bare(Vec<Poi>),
}

impl From<WireResponse> for PoiResponse {
    fn from(wire: WireResponse) -> Self {
        match wire {
            WireResponse::Wrapped(response) => response,
            WireResponse::Bare(routes) => PoiResponse {
                routes,
                explanation: String::new(),
            },
        }
    }
}

/// Parse a response body from the service
pub(crate) fn parse_body(body: &str) -> Result<PoiResponse, PoiError> {
    let wire: WireResponse = serde_json::from_str(body)?;
    Ok(wire.into())
}

/// POI service client over HTTP
pub struct HttpPoiClient {
    endpoint: String,
    http: Client,
}

impl HttpPoiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &PoiServiceConfig) -> Result<Self, PoiError> {
        debug!(?config, "HttpPoiClient::from_config: called");
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(PoiError::Network)?;

        Ok(Self {
            endpoint: config.endpoint(),
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PoiClient for HttpPoiClient {
    async fn fetch(&self, request: PoiRequest) -> Result<PoiResponse, PoiError> {
        debug!(endpoint = %self.endpoint, interests = ?request.interests, "fetch: called");

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "fetch: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self.http.post(&self.endpoint).json(&request).send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "fetch: network error");
                    last_error = Some(PoiError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if !response.status().is_success() {
                let text = response.text().await.unwrap_or_default();
                let error = PoiError::Api { status, message: text };
                if error.is_retryable() && attempt < MAX_RETRIES {
                    debug!(attempt, status, "fetch: retryable error");
                    last_error = Some(error);
                    continue;
                }
                debug!(%status, "fetch: API error");
                return Err(error);
            }

            let body = response.text().await?;
            let parsed = parse_body(&body)?;
            debug!(poi_count = parsed.routes.len(), "fetch: success");
            return Ok(parsed);
        }

        Err(last_error.unwrap_or_else(|| PoiError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_body() {
        let body = r#"{"routes": [{"id": 3, "title": "Park", "coordinate": "POINT (44.0 56.3)"}], "explanation": "Green"}"#;
        let parsed = parse_body(body).unwrap();
        assert_eq!(parsed.routes[0].id, 3);
        assert_eq!(parsed.explanation, "Green");
    }

    #[test]
    fn test_parse_bare_array_body() {
        let body = r#"[{"id": 3, "title": "Park", "coordinate": "POINT (44.0 56.3)"}]"#;
        let parsed = parse_body(body).unwrap();
        assert_eq!(parsed.routes.len(), 1);
        assert!(parsed.explanation.is_empty());
    }

    #[test]
    fn test_parse_bad_body() {
        assert!(matches!(parse_body("{\"nope\": 1}"), Err(PoiError::Json(_))));
    }

    #[test]
    fn test_from_config_builds_endpoint() {
        let config = PoiServiceConfig {
            base_url: "http://192.168.1.68".to_string(),
            ..Default::default()
        };
        let client = HttpPoiClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint(), "http://192.168.1.68/api/routes");
    }
}

//! PoiClient trait definition

use async_trait::async_trait;

use super::{PoiError, PoiRequest, PoiResponse};

/// Client for the external POI fetch service
///
/// Given interests, a walking budget and an optional start location, the
/// service returns an ordered list of POIs plus an explanatory note.
#[async_trait]
pub trait PoiClient: Send + Sync {
    async fn fetch(&self, request: PoiRequest) -> Result<PoiResponse, PoiError>;
}

/// Scripted client for tests and offline runs
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::debug;

    /// One scripted reply
    #[derive(Debug, Clone)]
    pub enum MockPoiReply {
        Ok(PoiResponse),
        ApiError(u16),
    }

    /// Mock POI client that replays scripted replies in order
    pub struct MockPoiClient {
        replies: Mutex<VecDeque<MockPoiReply>>,
        requests: Mutex<Vec<PoiRequest>>,
        call_count: AtomicUsize,
        delay: Duration,
    }

    impl MockPoiClient {
        pub fn new(replies: Vec<MockPoiReply>) -> Self {
            debug!(reply_count = %replies.len(), "MockPoiClient::new: called");
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        /// Delay every reply by `delay`
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Requests received so far
        pub fn requests(&self) -> Vec<PoiRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl PoiClient for MockPoiClient {
        async fn fetch(&self, request: PoiRequest) -> Result<PoiResponse, PoiError> {
            debug!(?request, "MockPoiClient::fetch: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request);
            }

            let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            match reply {
                Some(MockPoiReply::Ok(response)) => Ok(response),
                Some(MockPoiReply::ApiError(status)) => Err(PoiError::Api {
                    status,
                    message: "mock failure".to_string(),
                }),
                None => {
                    debug!("MockPoiClient::fetch: no more mock replies");
                    Err(PoiError::InvalidResponse("No more mock replies".to_string()))
                }
            }
        }
    }

}

//! POI fetch service
//!
//! Provides the client trait, an HTTP implementation and a scripted mock.

pub mod client;
mod error;
mod http;
mod types;

pub use client::PoiClient;
pub use client::mock::{MockPoiClient, MockPoiReply};
pub use error::PoiError;
pub use http::HttpPoiClient;
pub use types::{PoiRequest, PoiResponse};

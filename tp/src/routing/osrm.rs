//! Routing client for OSRM-compatible servers
//!
//! Uses the `route` service with full GeoJSON overview geometry; one leg is
//! returned per pair of consecutive waypoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Leg, RouteOptions, RoutedPath, RoutingError, RoutingService, Waypoint};
use crate::config::RoutingConfig;
use crate::domain::Coordinate;

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[lon, lat]` pairs
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    /// Seconds
    duration: f64,
    /// Meters
    distance: f64,
}

/// Duration label, whole minutes rounded up, never below one
pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).ceil().max(1.0) as u64;
    format!("{} min", minutes)
}

/// Distance label, whole meters
pub fn format_distance(meters: f64) -> String {
    format!("{}", meters.max(0.0).round() as u64)
}

fn convert_route(route: OsrmRoute) -> RoutedPath {
    RoutedPath {
        geometry: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate::new(lat, lon))
            .collect(),
        legs: route
            .legs
            .into_iter()
            .map(|leg| Leg::new(format_duration(leg.duration), format_distance(leg.distance)))
            .collect(),
    }
}

/// Interpret a response body; `NoRoute` is the zero-paths case
fn parse_body(status: u16, body: &str) -> Result<Vec<RoutedPath>, RoutingError> {
    let parsed: OsrmResponse = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) if (200..300).contains(&status) => {
            return Err(RoutingError::InvalidResponse(e.to_string()));
        }
        Err(_) => {
            return Err(RoutingError::Api {
                status,
                message: body.to_string(),
            });
        }
    };

    match parsed.code.as_str() {
        "Ok" => Ok(parsed.routes.into_iter().map(convert_route).collect()),
        "NoRoute" => {
            debug!("parse_body: server found no route");
            Ok(vec![])
        }
        other => Err(RoutingError::Api {
            status,
            message: parsed.message.unwrap_or_else(|| other.to_string()),
        }),
    }
}

/// Pedestrian routing over an OSRM-compatible HTTP API
pub struct OsrmRoutingClient {
    base_url: String,
    profile: String,
    http: Client,
}

impl OsrmRoutingClient {
    /// Create a new client from configuration
    pub fn from_config(config: &RoutingConfig) -> Result<Self, RoutingError> {
        debug!(?config, "OsrmRoutingClient::from_config: called");
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(RoutingError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
            http,
        })
    }

    /// Request URL for the given waypoints
    pub fn route_url(&self, waypoints: &[Waypoint]) -> String {
        let points = waypoints
            .iter()
            .map(|w| format!("{},{}", w.coordinate.longitude, w.coordinate.latitude))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&steps=false",
            self.base_url, self.profile, points
        )
    }
}

#[async_trait]
impl RoutingService for OsrmRoutingClient {
    async fn route(&self, waypoints: Vec<Waypoint>, options: RouteOptions) -> Result<Vec<RoutedPath>, RoutingError> {
        debug!(waypoint_count = waypoints.len(), ?options, "route: called");

        if waypoints.len() < 2 {
            debug!("route: fewer than two waypoints, nothing to route");
            return Ok(vec![]);
        }
        if options.avoid_stairs || options.avoid_steep {
            warn!("route: fitness options are not supported by this server and are ignored");
        }

        let url = self.route_url(&waypoints);
        let response = self.http.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let paths = parse_body(status, &body)?;
        debug!(path_count = paths.len(), "route: success");
        Ok(paths)
    }
}

//! Trip planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::DEFAULT_WALKING_MINUTES;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// POI fetch service
    #[serde(rename = "poi-service")]
    pub poi_service: PoiServiceConfig,

    /// Pedestrian routing service
    pub routing: RoutingConfig,

    /// Planner timings and defaults
    pub planner: PlannerConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.poi_service.base_url.trim().is_empty() {
            return Err(eyre::eyre!("poi-service.base-url must not be empty"));
        }
        if self.routing.base_url.trim().is_empty() {
            return Err(eyre::eyre!("routing.base-url must not be empty"));
        }
        if self.planner.trim_interval_ms == 0 {
            return Err(eyre::eyre!("planner.trim-interval-ms must be greater than zero"));
        }
        if self.planner.error_expiry_ms == 0 {
            return Err(eyre::eyre!("planner.error-expiry-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripplanner.yml
        let local_config = PathBuf::from(".tripplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripplanner/tripplanner.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: a broken config file is reported later by `load`.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => [Some(PathBuf::from(".tripplanner.yml")), user_config_path()]
                .into_iter()
                .flatten()
                .collect(),
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tripplanner").join("tripplanner.yml"))
}

/// POI fetch service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiServiceConfig {
    /// Service base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Endpoint path appended to the base URL
    pub path: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for PoiServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            path: "api/routes".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl PoiServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full endpoint URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Routing service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// OSRM-compatible routing server base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Routing profile name
    pub profile: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Pass-through fitness option
    #[serde(rename = "avoid-steep")]
    pub avoid_steep: bool,

    /// Pass-through fitness option
    #[serde(rename = "avoid-stairs")]
    pub avoid_stairs: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "foot".to_string(),
            timeout_ms: 30_000,
            avoid_steep: false,
            avoid_stairs: false,
        }
    }
}

impl RoutingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Planner timings and defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// How often the displayed path is trimmed to the live position
    #[serde(rename = "trim-interval-ms")]
    pub trim_interval_ms: u64,

    /// How long a user-facing error stays visible
    #[serde(rename = "error-expiry-ms")]
    pub error_expiry_ms: u64,

    /// Initial walking budget in minutes
    #[serde(rename = "default-walking-minutes")]
    pub default_walking_minutes: u32,

    /// Whether the current location starts the trip by default
    #[serde(rename = "use-location")]
    pub use_location: bool,

    /// Upper bound on a single POI fetch, in milliseconds
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            trim_interval_ms: 5_000,
            error_expiry_ms: 3_000,
            default_walking_minutes: DEFAULT_WALKING_MINUTES,
            use_location: true,
            fetch_timeout_ms: 60_000,
        }
    }
}

impl PlannerConfig {
    pub fn trim_interval(&self) -> Duration {
        Duration::from_millis(self.trim_interval_ms)
    }

    pub fn error_expiry(&self) -> Duration {
        Duration::from_millis(self.error_expiry_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

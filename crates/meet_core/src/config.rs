//! Search configuration.
//!
//! Every field has a default, so an empty (or absent) `meet.toml` is valid.
//!
//! ```toml
//! geocode_timeout_ms = 8000
//! travel_time_timeout_ms = 8000
//! max_candidates = 10
//! batch_failure = "degrade"
//! cache_capacity = 20000
//!
//! [travel_time_provider]
//! kind = "osrm"
//! endpoint = "http://localhost:5000"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::ports::DEFAULT_MAX_RESULTS;
use crate::providers::TravelTimeProviderKind;

/// The config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "meet.toml";

pub const DEFAULT_GEOCODE_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_TRAVEL_TIME_TIMEOUT_MS: u64 = 8_000;
/// Travel-time cache entries, per (origin, destination, mode).
pub const DEFAULT_CACHE_CAPACITY: usize = 20_000;

/// What to do when one origin's whole travel-time batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFailurePolicy {
    /// Mark that origin's legs unreachable for every venue and keep going.
    #[default]
    Degrade,
    /// Fail the whole search.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-address geocode timeout.
    pub geocode_timeout_ms: u64,
    /// Per-origin travel-time batch timeout.
    pub travel_time_timeout_ms: u64,
    /// Cap on venues requested from the candidate search.
    pub max_candidates: usize,
    pub batch_failure: BatchFailurePolicy,
    pub travel_time_provider: TravelTimeProviderKind,
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            geocode_timeout_ms: DEFAULT_GEOCODE_TIMEOUT_MS,
            travel_time_timeout_ms: DEFAULT_TRAVEL_TIME_TIMEOUT_MS,
            max_candidates: DEFAULT_MAX_RESULTS,
            batch_failure: BatchFailurePolicy::default(),
            travel_time_provider: TravelTimeProviderKind::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SearchConfig {
    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }

    pub fn travel_time_timeout(&self) -> Duration {
        Duration::from_millis(self.travel_time_timeout_ms)
    }

    pub fn with_geocode_timeout_ms(mut self, ms: u64) -> Self {
        self.geocode_timeout_ms = ms;
        self
    }

    pub fn with_travel_time_timeout_ms(mut self, ms: u64) -> Self {
        self.travel_time_timeout_ms = ms;
        self
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    pub fn with_batch_failure(mut self, policy: BatchFailurePolicy) -> Self {
        self.batch_failure = policy;
        self
    }

    pub fn with_travel_time_provider(mut self, kind: TravelTimeProviderKind) -> Self {
        self.travel_time_provider = kind;
        self
    }
}

/// Parse a config from TOML text.
pub fn parse_config(contents: &str) -> Result<SearchConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Load and parse a config file.
pub fn load_config(path: &Path) -> Result<SearchConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&contents)
}

/// Load `path` if it exists, else the defaults.
pub fn load_or_default(path: &Path) -> Result<SearchConfig, ConfigError> {
    if path.exists() {
        debug!(path = %path.display(), "loading search config");
        load_config(path)
    } else {
        debug!(path = %path.display(), "no search config found, using defaults");
        Ok(SearchConfig::default())
    }
}

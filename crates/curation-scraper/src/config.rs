//! Runtime configuration for fetching and extraction limits.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Env var overriding [`ScraperConfig::timeout_secs`].
pub const ENV_TIMEOUT: &str = "CURATION_SCRAPER_TIMEOUT";
/// Env var overriding [`ScraperConfig::user_agent`].
pub const ENV_USER_AGENT: &str = "CURATION_SCRAPER_USER_AGENT";

/// Settings shared by the fetcher and the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum items kept per `<ul>`/`<ol>`.
    #[serde(default = "default_max_list_items")]
    pub max_list_items: usize,
    /// Navigation blocks at or above this length are dropped.
    #[serde(default = "default_max_nav_length")]
    pub max_nav_length: usize,
    /// Footers at or above this length are dropped.
    #[serde(default = "default_max_footer_length")]
    pub max_footer_length: usize,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) CurationPreview/1.0".to_string()
}

fn default_max_list_items() -> usize {
    20
}

fn default_max_nav_length() -> usize {
    800
}

fn default_max_footer_length() -> usize {
    500
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_list_items: default_max_list_items(),
            max_nav_length: default_max_nav_length(),
            max_footer_length: default_max_footer_length(),
        }
    }
}

impl ScraperConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `CURATION_SCRAPER_*` environment overrides.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn apply_env(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => tracing::warn!("ignoring invalid {ENV_TIMEOUT}={raw:?}"),
            }
        }
        if let Ok(ua) = std::env::var(ENV_USER_AGENT) {
            if !ua.trim().is_empty() {
                self.user_agent = ua;
            }
        }
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

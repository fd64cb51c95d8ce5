/// Service configuration.
///
/// Endpoint URLs and request settings are injected into the service at
/// construction rather than read from globals, so tests can point the client
/// anywhere.
///
/// Sources, later ones winning:
///   1. built-in defaults (the public USGS endpoints)
///   2. a TOML file, e.g. `quakeview.toml`
///   3. `QUAKEVIEW_*` environment variables (a `.env` file is honoured)

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::ingest::usgs::{USGS_FEED_URL, USGS_QUERY_URL};
use crate::logging::LogLevel;
use crate::model::DEFAULT_LIMIT;

pub const ENV_FEED_URL: &str = "QUAKEVIEW_FEED_URL";
pub const ENV_QUERY_URL: &str = "QUAKEVIEW_QUERY_URL";
pub const ENV_DEFAULT_LIMIT: &str = "QUAKEVIEW_DEFAULT_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "QUAKEVIEW_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "QUAKEVIEW_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "QUAKEVIEW_LOG_FILE";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Io(std::io::Error),
    /// The config file is not valid TOML for `ServiceConfig`.
    Parse(String),
    /// An environment override could not be interpreted.
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Fixed "recent activity" GeoJSON feed.
    pub default_feed_url: String,
    /// FDSN event query endpoint, without a query string.
    pub range_query_url: String,
    /// Limit used when a caller does not pick one. Clamped at request time.
    pub default_limit: i64,
    /// `None` means no client-side timeout.
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_feed_url: USGS_FEED_URL.to_string(),
            range_query_url: USGS_QUERY_URL.to_string(),
            default_limit: DEFAULT_LIMIT,
            request_timeout_secs: None,
            user_agent: format!("quakeview_service/{}", env!("CARGO_PKG_VERSION")),
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }

    /// Loads `path`, then applies `.env` and process environment overrides.
    pub fn load_with_env(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Self::load(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from a key lookup. Blank values are ignored.
    ///
    /// Takes the lookup as a closure so tests need not touch the real
    /// process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_FEED_URL) {
            self.default_feed_url = url;
        }
        if let Some(url) = get(ENV_QUERY_URL) {
            self.range_query_url = url;
        }
        if let Some(raw) = get(ENV_DEFAULT_LIMIT) {
            self.default_limit = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_DEFAULT_LIMIT.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
            // 0 disables the timeout
            self.request_timeout_secs = if secs == 0 { None } else { Some(secs) };
        }
        if let Some(raw) = get(ENV_LOG_LEVEL) {
            self.log_level = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(path) = get(ENV_LOG_FILE) {
            self.log_file = Some(path);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.request_timeout_secs.map(std::time::Duration::from_secs)
    }
}

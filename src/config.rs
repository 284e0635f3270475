//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines constants
//! for default paths, the history window, logging, and API cache headers.
//! `AppConfig` is the root configuration struct containing all settings.

use serde::Deserialize;
use std::path::Path;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "abacus=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Number of records returned by the history endpoint
pub const DEFAULT_HISTORY_WINDOW: u32 = 20;

/// API responses are never cacheable: history changes with every
/// calculation and calculate is a POST.
pub const CACHE_CONTROL_API: &str = "no-store";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// History retrieval settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl HttpServerConfig {
    fn default_host() -> String {
        "127.0.0.1".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. Parent directories are created on
    /// startup if missing.
    #[serde(default = "DatabaseConfig::default_path")]
    pub path: String,
}

impl DatabaseConfig {
    fn default_path() -> String {
        "data/abacus.db".to_string()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

/// History retrieval settings
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of records returned by GET /api/history
    #[serde(default = "HistoryConfig::default_window")]
    pub window: u32,
}

impl HistoryConfig {
    fn default_window() -> u32 {
        DEFAULT_HISTORY_WINDOW
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window: Self::default_window(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to built-in
    /// defaults. A present-but-invalid file is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

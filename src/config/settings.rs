use chrono::TimeDelta;
use serde::Deserialize;

use crate::utils::constants::{DEFAULT_ENDPOINT_PATH, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_RATE_LIMIT_SECONDS};

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub token: TokenSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { path: default_metrics_path(), is_enabled: false }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String
}

/// Where the configuration record survives restarts.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransportConfig {
    /// whole-request timeout for calls to the token issuer
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { timeout_ms: default_timeout_ms() }
    }
}

/// Token cache policy.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    /// minimum interval between two fetch attempts, successful or not
    #[serde(default = "default_rate_limit_seconds")]
    pub rate_limit_seconds: u64,
    /// path appended to the configured host
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
}

impl TokenSettings {
    pub fn rate_limit(&self) -> TimeDelta {
        let seconds = i64::try_from(self.rate_limit_seconds).unwrap_or(i64::MAX);
        TimeDelta::seconds(seconds.min(i64::MAX / 1000))
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            rate_limit_seconds: default_rate_limit_seconds(),
            endpoint_path: default_endpoint_path(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_storage_path() -> String {
    "customer-token-agent.state.json".to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_rate_limit_seconds() -> u64 {
    DEFAULT_RATE_LIMIT_SECONDS
}

fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

use serde::Deserialize;

use crate::config::customer_token::ConfigureRequest;
use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    /// Applied through `configure` once at startup, on top of the persisted record.
    pub customer_token: Option<ConfigureRequest>,
}

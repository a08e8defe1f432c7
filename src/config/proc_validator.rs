//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - server address, metrics path, token policy and transport timeout
//! - startup customer token host scheme

use tracing::{error, info};

use crate::config::customer_token::ConfigureRequest;
use crate::config::service::ServiceConfig;
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    if let Some(customer_token) = &cfg.customer_token {
        validate_customer_token(customer_token, &mut errors);
    }

    if errors.is_empty() {
        info!("config is valid");
        return Ok(());
    }

    let metrics = get_metrics().await;
    for err in &errors {
        error!("config error: {}", err);
        metrics.config_validation_errors.inc();
    }
    Err(errors)
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' is not a valid port",
            settings.server.port
        ));
    }

    if !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        let level = logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            errors.push(format!("settings.logging.level '{}' is not supported", logging.level));
        }
    }

    if settings.storage.path.trim().is_empty() {
        errors.push("settings.storage.path must not be empty".to_string());
    }

    if settings.transport.timeout_ms == 0 {
        errors.push("settings.transport.timeout_ms must be greater than 0".to_string());
    }

    if settings.token.rate_limit_seconds == 0 {
        errors.push("settings.token.rate_limit_seconds must be greater than 0".to_string());
    }
    if !settings.token.endpoint_path.starts_with('/') {
        errors.push(format!(
            "settings.token.endpoint_path '{}' must start with '/'",
            settings.token.endpoint_path
        ));
    }
}

fn validate_customer_token(request: &ConfigureRequest, errors: &mut Vec<String>) {
    if let Some(host) = &request.host {
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            errors.push(format!(
                "customer_token.host '{}' must start with http:// or https://",
                host
            ));
        }
    }
    if request.customer_ids.as_ref().is_some_and(|ids| ids.is_empty()) {
        errors.push("customer_token.customerIds must not be empty when set".to_string());
    }
}

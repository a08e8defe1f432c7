use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::token_routes::{AgentTokenManager, TokenState};

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub token_state: TokenState,
}

impl AppState {
    pub fn new(metrics: &Metrics, manager: Arc<AgentTokenManager>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            token_state: TokenState::new(manager),
        }
    }
}

pub async fn router(settings_config: &SettingsConfig, manager: Arc<AgentTokenManager>) -> Router {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, manager);

    Router::new()
        .merge(state.metrics_state.router(&settings_config.metrics))
        .merge(state.token_state.router())
        .with_state(state)
}

/// Serve the configure/token routes and, when enabled, the metrics route.
pub async fn start(settings_config: &SettingsConfig, manager: Arc<AgentTokenManager>) -> Result<()> {
    let app = router(settings_config, manager).await;

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind {}", bind_addr))?;
    info!("listening on {}", bind_addr);

    get_metrics().await.up.set(1);
    axum::serve(listener, app).await?;
    Ok(())
}

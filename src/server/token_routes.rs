//! Boundary adapters: `configure` for the host application and the
//! authorization supplier used to decorate outbound calls.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use crate::cache::CustomerTokenManager;
use crate::config::customer_token::ConfigureRequest;
use crate::server::server::AppState;
use crate::storage::FileStore;
use crate::transport::HttpTransport;

pub type AgentTokenManager = CustomerTokenManager<HttpTransport, FileStore>;

pub const CONFIGURE_PATH: &str = "/configure";
pub const TOKEN_PATH: &str = "/token";
pub const AUTHORIZATION_PATH: &str = "/authorization";

#[derive(Clone)]
pub struct TokenState {
    manager: Arc<AgentTokenManager>,
}

impl TokenState {
    pub fn new(manager: Arc<AgentTokenManager>) -> Self {
        Self { manager }
    }

    pub fn router(&self) -> Router<AppState> {
        info!("served paths: {}, {}, {}", CONFIGURE_PATH, TOKEN_PATH, AUTHORIZATION_PATH);
        Router::new()
            .route(CONFIGURE_PATH, post(configure))
            .route(TOKEN_PATH, get(token))
            .route(AUTHORIZATION_PATH, get(authorization))
    }
}

async fn configure(State(state): State<AppState>, Json(request): Json<ConfigureRequest>) -> StatusCode {
    state.token_state.manager.configure(request).await;
    StatusCode::NO_CONTENT
}

async fn token(State(state): State<AppState>) -> Response {
    let token = state.token_state.manager.retrieve_token().await;
    Json(json!({ "customer_token": token })).into_response()
}

/// The bare token for the caller's authorization header, or 204 when no
/// credential is available.
async fn authorization(State(state): State<AppState>) -> Response {
    match state.token_state.manager.retrieve_token().await {
        Some(token) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain")],
            token,
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

//! # Customer token manager
//!
//! Single authority for the customer token: owns the configuration record,
//! the cached token and the fetch-attempt gate.
//!
//! `retrieve_token` contacts the issuer at most once per rate-limit window.
//! Inside the window the cached value is returned as is, even when it is
//! `None`. Once a token is cached it is reused until `configure` clears it.

use std::fmt;

use chrono::TimeDelta;
use http::StatusCode;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::cache::token::{CustomerTokenRequest, CustomerTokenResponse};
use crate::cache::token_cache::TokenCache;
use crate::config::customer_token::{ConfigureRequest, CustomerTokenConfig};
use crate::config::settings::TokenSettings;
use crate::helpers::time::{get_instant, Clock, SystemClock};
use crate::observability::metrics::{get_metrics, OUTCOME_CACHED, OUTCOME_FETCHED, OUTCOME_RATE_LIMITED};
use crate::storage::{ConfigStore, KeyValueStore};
use crate::transport::Transport;

/// Why a fetch attempt produced no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// required configuration fields are missing; no request was sent
    NotReady,
    /// 404, the backend does not offer customer tokens
    NotSupported,
    /// any other non-2xx, transport faults included
    Remote(StatusCode),
    Malformed(String),
}

impl FetchFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            FetchFailure::NotReady => "not_ready",
            FetchFailure::NotSupported => "not_supported",
            FetchFailure::Remote(_) => "remote_error",
            FetchFailure::Malformed(_) => "malformed",
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::NotReady => write!(f, "not configured yet"),
            FetchFailure::NotSupported => write!(f, "token endpoint not supported (404)"),
            FetchFailure::Remote(status) => write!(f, "token request returned {}", status),
            FetchFailure::Malformed(reason) => write!(f, "token cannot be parsed: {}", reason),
        }
    }
}

#[derive(Debug, Default)]
struct ManagerState {
    config: CustomerTokenConfig,
    cache: TokenCache,
}

pub struct CustomerTokenManager<T, S, C = SystemClock> {
    transport: T,
    store: ConfigStore<S>,
    clock: C,
    rate_limit: TimeDelta,
    endpoint_path: String,
    /// Held across the fetch, so concurrent callers wait for the in-flight
    /// attempt and then read its result instead of issuing their own.
    state: Mutex<ManagerState>,
}

impl<T, S> CustomerTokenManager<T, S, SystemClock>
where
    T: Transport,
    S: KeyValueStore,
{
    pub async fn new(transport: T, store: S, settings: &TokenSettings) -> Self {
        Self::with_clock(transport, store, SystemClock, settings).await
    }
}

impl<T, S, C> CustomerTokenManager<T, S, C>
where
    T: Transport,
    S: KeyValueStore,
    C: Clock,
{
    /// Loads the persisted configuration record; the cache starts empty.
    pub async fn with_clock(transport: T, store: S, clock: C, settings: &TokenSettings) -> Self {
        let store = ConfigStore::new(store);
        let config = store.load().await;
        debug!("customer token configuration loaded, ready: {}", config.is_ready());
        Self {
            transport,
            store,
            clock,
            rate_limit: settings.rate_limit(),
            endpoint_path: settings.endpoint_path.clone(),
            state: Mutex::new(ManagerState {
                config,
                cache: TokenCache::default(),
            }),
        }
    }

    /// Merge the supplied fields, persist the whole record and clear the cache,
    /// so the next `retrieve_token` fetches with the new configuration.
    /// Persistence is best effort: failures are logged, never returned.
    pub async fn configure(&self, request: ConfigureRequest) {
        let metrics = get_metrics().await;
        metrics.configure_calls.inc();

        let mut state = self.state.lock().await;
        state.config.merge(request);
        if let Err(err) = self.store.save(&state.config).await {
            metrics.persist_failures.inc();
            error!("storing customer token configuration failed: {:#}", err);
        }
        state.cache.reset();
        metrics.token_cached.set(0);
        info!("customer token configured, ready: {}", state.config.is_ready());
    }

    /// Current token, fetching one when the gate is open and nothing is cached.
    /// `None` means no credential is available; it is not an error.
    pub async fn retrieve_token(&self) -> Option<String> {
        let metrics = get_metrics().await;
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if !state.cache.is_gate_open(now, self.rate_limit) {
            debug!("token requested within rate limit window, using cache {:?}", state.cache.token);
            metrics.token_requests.with_label_values(&[OUTCOME_RATE_LIMITED]).inc();
            return state.cache.token.clone();
        }
        state.cache.mark_attempt(now);

        if let Some(token) = &state.cache.token {
            debug!("token cache returned");
            metrics.token_requests.with_label_values(&[OUTCOME_CACHED]).inc();
            return Some(token.clone());
        }

        metrics.token_requests.with_label_values(&[OUTCOME_FETCHED]).inc();
        let token = match self.fetch_token(&state.config).await {
            Ok(token) => token,
            Err(failure) => {
                metrics.token_fetch_failures.with_label_values(&[failure.reason()]).inc();
                match &failure {
                    FetchFailure::NotReady | FetchFailure::NotSupported => debug!("no customer token: {}", failure),
                    FetchFailure::Remote(_) | FetchFailure::Malformed(_) => error!("no customer token: {}", failure),
                }
                None
            }
        };
        metrics.token_cached.set(i64::from(token.is_some()));
        state.cache.token = token.clone();
        token
    }

    /// Snapshot of the configuration record.
    pub async fn configuration(&self) -> CustomerTokenConfig {
        self.state.lock().await.config.clone()
    }

    /// One request to the issuer. `Ok(None)` is a well-formed response whose token is null.
    async fn fetch_token(&self, config: &CustomerTokenConfig) -> Result<Option<String>, FetchFailure> {
        let ready = config.ready_parts().ok_or(FetchFailure::NotReady)?;

        let request = CustomerTokenRequest {
            project_id: ready.project_token,
            kid: ready.public_key,
            sub: ready.customer_ids,
            exp: ready.expiration,
        };
        let body = serde_json::to_string(&request)
            .map_err(|err| FetchFailure::Malformed(err.to_string()))?;
        let url = ready.token_url(&self.endpoint_path);

        let metrics = get_metrics().await;
        metrics.token_fetch_attempts.inc();
        let start = get_instant();
        let response = self.transport.post(&url, None, body).await;
        metrics
            .token_fetch_duration
            .with_label_values(&[response.status.as_str()])
            .observe(start.elapsed().as_secs_f64());
        debug!("requested customer token from {}, status {}", url, response.status);

        if !response.is_success() {
            if response.status == StatusCode::NOT_FOUND {
                return Err(FetchFailure::NotSupported);
            }
            return Err(FetchFailure::Remote(response.status));
        }

        let parsed: CustomerTokenResponse = serde_json::from_str(&response.body)
            .map_err(|err| FetchFailure::Malformed(format!("{} in '{}'", err, response.body)))?;
        match &parsed.token {
            Some(_) => debug!("customer token received, expire_time {:?}", parsed.expiration),
            None => debug!("customer token received NULL"),
        }
        Ok(parsed.token)
    }
}

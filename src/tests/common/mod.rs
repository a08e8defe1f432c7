// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use http::{StatusCode, Version};
use reqwest::Client;

use crate::config::customer_token::ConfigureRequest;
use crate::helpers::time::Clock;
use crate::storage::KeyValueStore;
use crate::transport::{Transport, TransportResponse};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// A configure request that makes the record ready.
pub fn ready_request(host: &str) -> ConfigureRequest {
    ConfigureRequest {
        host: Some(host.to_owned()),
        project_token: Some("project-123".to_owned()),
        public_key: Some("kid-abc".to_owned()),
        customer_ids: Some(HashMap::from([("registered".to_owned(), "alice@example.com".to_owned())])),
        expiration: None,
    }
}

pub fn response(status: StatusCode, body: &str) -> TransportResponse {
    TransportResponse::new(
        status,
        Version::HTTP_11,
        status.canonical_reason().unwrap_or_default().to_owned(),
        body.to_owned(),
    )
}

pub fn token_response(token: &str) -> TransportResponse {
    response(
        StatusCode::OK,
        &json!({ "customer_token": token, "expire_time": 3600 }).to_string(),
    )
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Scripted transport: pops queued responses, then repeats the fallback.
pub struct MockTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    fallback: TransportResponse,
    delay: Duration,
    calls: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn always(fallback: TransportResponse) -> Arc<Self> {
        Self::scripted(Vec::new(), fallback)
    }

    pub fn scripted(responses: Vec<TransportResponse>, fallback: TransportResponse) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            fallback,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(fallback: TransportResponse, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            fallback,
            delay,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn respond(&self, url: &str, authorization: Option<&str>, body: String) -> TransportResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_owned(),
            authorization: authorization.map(str::to_owned),
            body,
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

impl Transport for MockTransport {
    async fn post(&self, url: &str, authorization: Option<&str>, body: String) -> TransportResponse {
        self.respond(url, authorization, body).await
    }

    async fn get(&self, url: &str, authorization: Option<&str>) -> TransportResponse {
        self.respond(url, authorization, String::new()).await
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Self { now: Arc::new(Mutex::new(start)) }
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Store whose writes always fail; reads return nothing.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    async fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk full"))
    }
}

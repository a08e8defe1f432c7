//! Outbound HTTP with a never-fails contract: every call yields a
//! [`TransportResponse`], transport faults included.

use std::future::Future;
use std::sync::Arc;

use http::{StatusCode, Version};

pub mod http_client;

pub use http_client::HttpTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub version: Version,
    /// Reason phrase, or the fault description for synthetic responses.
    pub message: String,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, version: Version, message: String, body: String) -> Self {
        Self { status, version, message, body }
    }

    /// Synthetic response standing in for a request that never completed
    /// (DNS, connect, TLS, timeout, broken body).
    pub fn canceled(reason: &str) -> Self {
        let message = format!("Error: request canceled by {}", reason);
        Self {
            status: StatusCode::BAD_REQUEST,
            version: Version::HTTP_11,
            body: message.clone(),
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

pub trait Transport: Send + Sync {
    fn post(
        &self,
        url: &str,
        authorization: Option<&str>,
        body: String,
    ) -> impl Future<Output = TransportResponse> + Send;

    fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> impl Future<Output = TransportResponse> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn post(
        &self,
        url: &str,
        authorization: Option<&str>,
        body: String,
    ) -> impl Future<Output = TransportResponse> + Send {
        (**self).post(url, authorization, body)
    }

    fn get(
        &self,
        url: &str,
        authorization: Option<&str>,
    ) -> impl Future<Output = TransportResponse> + Send {
        (**self).get(url, authorization)
    }
}

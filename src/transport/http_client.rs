use std::time::Duration;

use anyhow::Result;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use crate::transport::{Transport, TransportResponse};
use crate::utils::constants::CONTENT_TYPE_JSON;

/// reqwest-backed transport. Faults are turned into a 400 response
/// at this boundary, so callers only ever branch on status codes.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Only GET and POST are supported. Any other method is a programming
    /// error and panics.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        authorization: Option<&str>,
        body: Option<String>,
    ) -> TransportResponse {
        let request = self.build(method, url, authorization, body);
        match execute(request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("request to {} failed: {}", url, err);
                TransportResponse::canceled(&err.to_string())
            }
        }
    }

    fn build(
        &self,
        method: Method,
        url: &str,
        authorization: Option<&str>,
        body: Option<String>,
    ) -> RequestBuilder {
        let mut request = match method {
            Method::GET => self.client.get(url),
            Method::POST => self.client.post(url),
            other => panic!("Http method {} not supported.", other),
        };
        request = request.header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        request
    }
}

async fn execute(request: RequestBuilder) -> reqwest::Result<TransportResponse> {
    let response = request.send().await?;
    let status = response.status();
    let version = response.version();
    let message = status.canonical_reason().unwrap_or_default().to_owned();
    let body = response.text().await?;
    debug!("response status {}, body length {}", status, body.len());
    Ok(TransportResponse::new(status, version, message, body))
}

impl Transport for HttpTransport {
    async fn post(&self, url: &str, authorization: Option<&str>, body: String) -> TransportResponse {
        self.request(Method::POST, url, authorization, Some(body)).await
    }

    async fn get(&self, url: &str, authorization: Option<&str>) -> TransportResponse {
        self.request(Method::GET, url, authorization, None).await
    }
}

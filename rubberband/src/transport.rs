//! HTTP transport
//!
//! [`Transport`] is the only seam between the facade and the network: one
//! request in, one raw response out. [`HttpTransport`] is the `reqwest`
//! implementation used by default.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::uri::{build_url, Endpoint};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// A single request to send
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn new(method: Method, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            params: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn json_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self.header(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)
    }

    pub fn ndjson_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self.header(CONTENT_TYPE.as_str(), NDJSON_CONTENT_TYPE)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Raw response: status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Fail with a `Request` error unless the status is one of `expected`
    pub fn expect_status(self, expected: &[u16]) -> Result<Self> {
        if expected.contains(&self.status) {
            Ok(self)
        } else {
            Err(Error::from_response(self.status, &self.body))
        }
    }
}

/// Sends one request to an Elasticsearch server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and return status and body
    ///
    /// Implementations raise on server-error statuses (>= 500); every other
    /// status is handed back for the caller to interpret.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &Url;
}

/// `reqwest`-backed transport holding one long-lived session
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder().connect_timeout(config.connect_timeout());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn headers(request: &TransportRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("Invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("Invalid header value for '{}': {}", name, e)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = build_url(&self.base_url, &request.endpoint, &request.params)?;
        let headers = Self::headers(&request)?;
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers);
        if let Some(username) = &self.username {
            builder = builder.basic_auth(username, self.password.as_ref());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            method = %request.method,
            url = %url,
            status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "elasticsearch request"
        );

        if status >= 500 {
            warn!(method = %request.method, url = %url, status, "elasticsearch server error");
            return Err(Error::from_response(status, &body));
        }

        Ok(TransportResponse { status, body })
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

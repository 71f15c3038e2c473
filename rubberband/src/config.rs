//! Client configuration
//!
//! Can be built in code or loaded from a TOML file:
//!
//! ```toml
//! url = "http://127.0.0.1:9200"
//! index = "tweets"
//! doc_type = "tweet"
//! connect_timeout_ms = 5000
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Server base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Default index for operations that don't name one
    #[serde(default)]
    pub index: Option<String>,

    /// Default document type
    #[serde(default)]
    pub doc_type: Option<String>,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Whole-request timeout in milliseconds (none by default)
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// HTTP basic auth
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_url() -> String {
    "http://127.0.0.1:9200".to_string()
}

fn default_connect_timeout() -> u64 {
    5000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            index: None,
            doc_type: None,
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: None,
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.base_url()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parsed server URL
    ///
    /// A bare `host:port` (as older configs used) is accepted and treated as
    /// plain HTTP.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.url.trim();
        let url = if raw.contains("://") {
            Url::parse(raw)?
        } else {
            Url::parse(&format!("http://{}", raw))?
        };
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid server URL: {}", self.url)));
        }
        Ok(url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

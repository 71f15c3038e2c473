use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Connection failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (status {status}): {reason}")]
    Server { status: u16, reason: String },

    #[error("Request failed (status {status}): {reason}")]
    Request { status: u16, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document must serialize to a JSON object, got {0}")]
    InvalidDocument(&'static str),

    #[error("No index to target for {0}; set a default index or pass one explicitly")]
    MissingIndex(&'static str),

    #[error("Invalid {kind} '{value}': must be non-empty and not '.' or '..'")]
    InvalidName { kind: &'static str, value: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a `Server` or `Request` error from a raw Elasticsearch response
    pub fn from_response(status: u16, body: &str) -> Self {
        let reason = error_reason(body);
        if status >= 500 {
            Self::Server { status, reason }
        } else {
            Self::Request { status, reason }
        }
    }

    /// HTTP status carried by the error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Request { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Elasticsearch-style error body
#[derive(Debug, Deserialize)]
struct EsErrorResponse {
    error: EsErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EsErrorBody {
    Detail {
        #[serde(rename = "type")]
        error_type: String,
        reason: Option<String>,
    },
    Message(String),
    Other(Value),
}

/// Pull a readable reason out of an error body, falling back to the raw text
fn error_reason(body: &str) -> String {
    match serde_json::from_str::<EsErrorResponse>(body) {
        Ok(EsErrorResponse {
            error: EsErrorBody::Detail { error_type, reason },
        }) => match reason {
            Some(reason) => format!("{}: {}", error_type, reason),
            None => error_type,
        },
        Ok(EsErrorResponse {
            error: EsErrorBody::Message(message),
        }) => message,
        Ok(EsErrorResponse {
            error: EsErrorBody::Other(value),
        }) => value.to_string(),
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

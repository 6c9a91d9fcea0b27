//! # ApiError
//!
//! The one failure type that crosses the transport boundary. Transports
//! produce it, the logging interceptor passes it through untouched, and
//! views turn it into user-visible text.

use thiserror::Error;

/// Classification of a failed HTTP call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, DNS failure, CORS rejection, broken body stream.
    #[error("network: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not JSON, or not the shape the caller expected.
    #[error("decode: {0}")]
    Decode(String),

    /// The request could not be built (bad MIME type, unserializable
    /// payload). Nothing was sent.
    #[error("request: {0}")]
    Request(String),
}

impl ApiError {
    /// Builds a `Status` error, pulling the server's message out of a
    /// FastAPI-style `{"detail": ...}` body when there is one.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = detail_message(body)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| "HTTP error".to_string());
        ApiError::Status { status, message }
    }

    /// Status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-readable tag used in `http_request_error` records.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "network_error",
            ApiError::Status { .. } => "http_status_error",
            ApiError::Decode(_) => "decode_error",
            ApiError::Request(_) => "request_error",
        }
    }

    /// Text shown to the user. Network, decode and request failures get a
    /// generic message; status failures carry the code and the server's message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ApiError::Status { status, message } => format!("HTTP {status}: {message}"),
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::Request(_) => "The request could not be prepared.".to_string(),
        }
    }
}

fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(obj) => obj
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_string),
        _ => None,
    }
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

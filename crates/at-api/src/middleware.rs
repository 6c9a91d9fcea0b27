//! ascii-twitter/crates/at-api/src/middleware.rs Middleware
//!
//! Request logging around every outbound call. `LoggingTransport` wraps
//! any `HttpTransport` and records one start event plus exactly one
//! success or error event per request, all sharing a correlation id.
//! Each call also runs inside an `http_request` tracing span, which the
//! trace exporter ships to the collector.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use at_core::{ApiError, HttpRequest, HttpResponse, HttpTransport};
use at_telemetry::{ids, Fields, LogEmitter};
use serde_json::Value;
use tracing::field::Empty;
use tracing::Instrument;

/// Header names (lowercase) never written to logs.
pub const REDACTED_HEADERS: [&str; 2] = ["authorization", "cookie"];

pub struct LoggingTransport {
    inner: Arc<dyn HttpTransport>,
    log: LogEmitter,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn HttpTransport>, log: LogEmitter) -> Self {
        Self { inner, log }
    }
}

#[async_trait]
impl HttpTransport for LoggingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let started = Instant::now();
        let request_id = ids::correlation_id();
        let method = request.method.as_str();
        let url = request.url.clone();

        self.log.info(
            "http_request_start",
            &format!("HTTP request started: {method} {url}"),
            Fields::new()
                .with("request_id", &request_id)
                .with("method", method)
                .with("url", &url)
                .with("headers", &sanitize_headers(&request.headers))
                .with("body", if request.has_body() { "present" } else { "none" }),
        );

        let span = tracing::info_span!(
            "http_request",
            otel.kind = "client",
            http.method = method,
            http.url = %url,
            request_id = %request_id,
            http.status_code = Empty,
            otel.status_code = Empty,
        );
        let outcome = self.inner.send(request).instrument(span.clone()).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(response) => {
                span.record("http.status_code", response.status);
            }
            Err(err) => {
                if let Some(status) = err.status() {
                    span.record("http.status_code", status);
                }
                span.record("otel.status_code", "ERROR");
            }
        }

        match &outcome {
            Ok(response) => self.log.info(
                "http_request_success",
                &format!("HTTP request completed: {method} {url}"),
                Fields::new()
                    .with("request_id", &request_id)
                    .with("method", method)
                    .with("url", &url)
                    .with("status_code", &response.status)
                    .with("response_time_ms", &elapsed_ms)
                    .with("response_size_bytes", &response_size(response.body.as_ref()))
                    .with("response_type", response_type(response.body.as_ref())),
            ),
            Err(err) => self.log.error(
                "http_request_error",
                &format!("HTTP request failed: {method} {url}"),
                Fields::new()
                    .with("request_id", &request_id)
                    .with("method", method)
                    .with("url", &url)
                    .with("status_code", &err.status())
                    .with("response_time_ms", &elapsed_ms)
                    .with("error_message", &err.to_string())
                    .with("error_type", err.kind()),
            ),
        }

        outcome
    }
}

/// Drops `Authorization` and `Cookie` (any casing); every other header is
/// kept verbatim. When a name repeats, the first value wins.
pub fn sanitize_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    let mut sanitized = BTreeMap::new();
    for (name, value) in headers {
        let lowered = name.to_ascii_lowercase();
        if REDACTED_HEADERS.contains(&lowered.as_str()) {
            continue;
        }
        sanitized
            .entry(name.clone())
            .or_insert_with(|| value.clone());
    }
    sanitized
}

/// Length of the serialized body, zero for an empty one.
pub fn response_size(body: Option<&Value>) -> usize {
    match body {
        Some(v) if is_present(v) => v.to_string().len(),
        _ => 0,
    }
}

/// `array`, the JSON type name of anything else, or `empty`.
pub fn response_type(body: Option<&Value>) -> &'static str {
    match body {
        Some(v) if is_present(v) => match v {
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "empty",
        },
        _ => "empty",
    }
}

// null, false, 0 and "" count as no body at all.
fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

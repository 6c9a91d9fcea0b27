//! # Core Traits (Ports)
//!
//! Plugins implement these to be used by the client and the binary.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Sends one HTTP request. Implementations must not retry.
///
/// `Ok` is reserved for 2xx replies; every other outcome is an `ApiError`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request).await
    }
}

/// Destination for serialized log records, one line per call.
///
/// Writes must not fail loudly; a sink that cannot write drops the line.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

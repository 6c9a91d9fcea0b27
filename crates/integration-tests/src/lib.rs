//! Shared fixtures for the end-to-end tests: a scripted backend that
//! answers by method and path and remembers every request it saw.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use at_api::ApiClient;
use at_core::{ApiError, HttpRequest, HttpResponse, HttpTransport, Method};
use at_telemetry::{LogEmitter, MemorySink};
use tokio::sync::Notify;

pub const BASE_URL: &str = "http://backend.test";

struct Route {
    method: Method,
    path: &'static str,
    reply: Result<HttpResponse, ApiError>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<HttpRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        mut self,
        method: Method,
        path: &'static str,
        reply: Result<HttpResponse, ApiError>,
    ) -> Self {
        self.routes.push(Route { method, path, reply });
        self
    }

    /// Every reply waits for one `notify_one` on `gate`.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|r| r.method == method && r.url == format!("{BASE_URL}{path}"))
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let reply = self
            .routes
            .iter()
            .find(|r| r.method == request.method && request.url == format!("{BASE_URL}{}", r.path))
            .map(|r| r.reply.clone())
            .unwrap_or_else(|| {
                Err(ApiError::Status {
                    status: 404,
                    message: "Not Found".into(),
                })
            });
        lock(&self.calls).push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        reply
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Client against the scripted backend, logging into a fresh memory sink.
pub fn client(transport: Arc<ScriptedTransport>) -> (ApiClient, LogEmitter, MemorySink) {
    let sink = MemorySink::new();
    let log = LogEmitter::with_sink(Arc::new(sink.clone()));
    let client = ApiClient::new(BASE_URL, transport, log.clone());
    (client, log, sink)
}

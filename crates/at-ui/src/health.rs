//! Diagnostics panel: frontend status plus a backend `/health` check.

use at_api::client::HEALTH_PATH;
use at_api::ApiClient;
use at_core::HealthSnapshot;
use at_telemetry::{Fields, LogEmitter};
use chrono::{SecondsFormat, Utc};

const COMPONENT: &str = "HealthPanel";

#[derive(Debug, Default)]
pub struct HealthPanel {
    pub snapshot: Option<HealthSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
    pub request_url: String,
    pub requested_at: Option<String>,
    pub responded_at: Option<String>,
    /// Pretty-printed body of the last reply, or of the error.
    pub response_json: String,
}

impl HealthPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the diagnostics panel was opened.
    pub fn log_opened(&self, log: &LogEmitter, environment: &str, version: &str) {
        log.info(
            "frontend_health_check",
            "Frontend health check page accessed",
            Fields::new()
                .with("component", COMPONENT)
                .with("timestamp", &now())
                .with("status", "healthy")
                .with("version", version)
                .with("environment", environment),
        );
    }

    /// Runs one backend check. The previous snapshot is discarded first.
    pub async fn check(&mut self, client: &ApiClient, log: &LogEmitter) {
        self.loading = true;
        self.error = None;
        self.snapshot = None;
        self.request_url = client.url(HEALTH_PATH);
        let requested_at = now();
        self.requested_at = Some(requested_at.clone());

        log.info(
            "backend_health_request_start",
            "Backend health check request started",
            Fields::new()
                .with("component", COMPONENT)
                .with("request_url", &self.request_url)
                .with("request_time", &requested_at),
        );

        let outcome = client.fetch_health().await;
        let responded_at = now();
        self.responded_at = Some(responded_at.clone());

        match outcome {
            Ok(snapshot) => {
                self.response_json = serde_json::to_string_pretty(&snapshot).unwrap_or_default();
                log.info(
                    "backend_health_request_success",
                    "Backend health check completed successfully",
                    Fields::new()
                        .with("component", COMPONENT)
                        .with("response_time", &responded_at)
                        .with("response_time_ms", &snapshot.response_time_ms)
                        .with("status", &snapshot.status)
                        .with("request_id", &snapshot.request_id),
                );
                self.snapshot = Some(snapshot);
            }
            Err(err) => {
                let message = err.user_message();
                self.response_json = serde_json::to_string_pretty(&serde_json::json!({
                    "error_type": err.kind(),
                    "status": err.status(),
                    "message": err.to_string(),
                }))
                .unwrap_or_default();
                log.error(
                    "backend_health_request_error",
                    "Backend health check failed",
                    Fields::new()
                        .with("component", COMPONENT)
                        .with("response_time", &responded_at)
                        .with("error_message", &message)
                        .with("error_status", &err.status())
                        .with("request_url", &self.request_url),
                );
                self.error = Some(message);
            }
        }
        self.loading = false;
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

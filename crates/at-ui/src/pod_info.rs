//! Pod identity panel, filled automatically on load.

use at_api::ApiClient;
use at_core::PodInfo;

#[derive(Debug, Default)]
pub struct PodInfoPanel {
    pub info: Option<PodInfo>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PodInfoPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.loading = true;
        self.error = None;
        match client.fetch_pod_info().await {
            Ok(info) => {
                tracing::debug!(
                    pod_name = info.header_pod_name.as_deref().unwrap_or("-"),
                    pod_ip = info.header_pod_ip.as_deref().unwrap_or("-"),
                    "pod identity headers"
                );
                self.info = Some(info);
            }
            Err(err) => {
                tracing::warn!(error = %err, "pod info load failed");
                self.error = Some(err.user_message());
            }
        }
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use at_core::{ApiError, HttpResponse, MockHttpTransport};
    use at_telemetry::{LogEmitter, MemorySink};
    use serde_json::json;

    fn client(mock: MockHttpTransport) -> ApiClient {
        let log = LogEmitter::with_sink(Arc::new(MemorySink::new()));
        ApiClient::new("http://api.test", Arc::new(mock), log)
    }

    #[tokio::test]
    async fn loads_body_and_headers() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| r.url == "http://api.test/frontend-info")
            .returning(|_| {
                Ok(HttpResponse::json(200, json!({"pod_name": "web-2", "environment": "compose"}))
                    .with_header("X-Pod-Name", "web-2"))
            });
        let mut panel = PodInfoPanel::new();

        panel.load(&client(mock)).await;

        let info = panel.info.unwrap();
        assert_eq!(info.environment, "compose");
        assert_eq!(info.header_pod_name.as_deref(), Some("web-2"));
        assert_eq!(info.header_pod_ip, None);
        assert!(!panel.loading);
    }

    #[tokio::test]
    async fn failure_sets_error() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .returning(|_| Err(ApiError::Network("timeout".into())));
        let mut panel = PodInfoPanel::new();

        panel.load(&client(mock)).await;

        assert!(panel.info.is_none());
        assert!(panel.error.is_some());
    }
}

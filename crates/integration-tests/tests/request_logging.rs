use std::sync::Arc;

use at_core::{HttpResponse, Method};
use at_ui::{HealthPanel, PodInfoPanel, TimelinePage};
use integration_tests::{client, ScriptedTransport};
use serde_json::json;

#[tokio::test]
async fn start_and_outcome_share_a_correlation_id() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .on(
                Method::Get,
                "/tweets",
                Ok(HttpResponse::json(200, json!([{"id": "1", "tweet": "a"}]))),
            )
            .on(
                Method::Get,
                "/frontend-info",
                Ok(HttpResponse::json(200, json!({"pod_name": "web-0"}))
                    .with_header("X-Pod-Name", "web-0")
                    .with_header("X-Pod-IP", "10.0.0.7")),
            ),
    );
    let (client, _log, sink) = client(transport);
    let mut page = TimelinePage::new();
    let mut pod = PodInfoPanel::new();

    page.load(&client).await;
    pod.load(&client).await;

    let starts = sink.events("http_request_start");
    let done = sink.events("http_request_success");
    assert_eq!(starts.len(), 2);
    assert_eq!(done.len(), 2);
    for (start, end) in starts.iter().zip(&done) {
        let id = start["request_id"].as_str().unwrap();
        assert_eq!(id.len(), 13);
        assert_eq!(end["request_id"], id);
        assert_eq!(start["url"], end["url"]);
        assert_eq!(start["body"], "none");
        assert_eq!(start["headers"]["Accept"], "application/json");
    }
    assert_ne!(starts[0]["request_id"], starts[1]["request_id"]);
    assert_ne!(starts[0]["trace_id"], done[0]["trace_id"]);
    assert_eq!(done[0]["response_type"], "array");
    assert_eq!(done[1]["response_type"], "object");

    let info = pod.info.unwrap();
    assert_eq!(info.header_pod_name.as_deref(), Some("web-0"));
    assert_eq!(info.header_pod_ip.as_deref(), Some("10.0.0.7"));
}

#[tokio::test]
async fn unreachable_route_logs_one_error_record() {
    let transport = Arc::new(ScriptedTransport::new());
    let (client, log, sink) = client(transport.clone());
    let mut health = HealthPanel::new();

    health.check(&client, &log).await;

    assert_eq!(transport.calls().len(), 1);
    let errors = sink.events("http_request_error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["level"], "ERROR");
    assert_eq!(errors[0]["status_code"], 404);
    assert_eq!(errors[0]["error_type"], "http_status_error");
    assert!(sink.events("http_request_success").is_empty());

    assert_eq!(sink.events("backend_health_request_error").len(), 1);
    assert!(health.snapshot.is_none());
    assert_eq!(health.error.as_deref(), Some("HTTP 404: Not Found"));
}

#[tokio::test]
async fn every_line_is_a_complete_record() {
    let transport = Arc::new(ScriptedTransport::new().on(
        Method::Get,
        "/health",
        Ok(HttpResponse::json(200, json!({"status": "healthy"}))),
    ));
    let (client, log, sink) = client(transport);
    let mut health = HealthPanel::new();
    health.log_opened(&log, "local", "1.0.0");
    health.check(&client, &log).await;

    let records = sink.records();
    assert_eq!(records.len(), 5);
    for record in &records {
        for key in ["timestamp", "level", "event_type", "message", "service", "version", "trace_id", "span_id"] {
            assert!(record.get(key).is_some(), "{key} missing in {record}");
        }
        assert_eq!(record["service"], "ascii-twitter-frontend");
        assert_eq!(record["span_id"].as_str().unwrap().len(), 16);
    }
}

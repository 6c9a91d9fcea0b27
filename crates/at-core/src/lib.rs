//! ascii-twitter/crates/at-core/src/lib.rs
//!
//! Domain models, the error taxonomy, and the port traits shared by every
//! other crate of the ascii-twitter client.

pub mod error;
pub mod http;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use http::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_ids_accept_strings_and_numbers() {
        let text: EntryId = serde_json::from_value(json!("9b1c")).unwrap();
        let num: EntryId = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(text, EntryId::from("9b1c"));
        assert_eq!(num, EntryId::Number(3));
        assert_eq!(num.to_string(), "3");
    }

    #[test]
    fn new_post_omits_missing_ascii() {
        let post = NewPost {
            content: "hello".into(),
            author: "u".into(),
            category: "c".into(),
            ascii_content: None,
        };
        assert_eq!(
            serde_json::to_value(&post).unwrap(),
            json!({"content": "hello", "author": "u", "category": "c"})
        );
    }

    #[test]
    fn health_snapshot_tolerates_partial_bodies() {
        let snap: HealthSnapshot = serde_json::from_value(json!({
            "status": "healthy",
            "response_time_ms": 1.5,
            "system": {"hostname": "backend-0"}
        }))
        .unwrap();
        assert!(snap.is_healthy());
        assert_eq!(snap.system.hostname, "backend-0");
        assert_eq!(snap.ascii_art.files_count, 0);

        let odd: HealthSnapshot = serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert_eq!(odd.status, HealthStatus::Unknown);
    }

    #[tokio::test]
    async fn arc_transport_delegates() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Ok(HttpResponse::json(200, json!([]))));
        let shared: std::sync::Arc<dyn HttpTransport> = std::sync::Arc::new(mock);
        let resp = shared.send(HttpRequest::get("http://x/tweets")).await.unwrap();
        assert_eq!(resp.status, 200);
    }
}

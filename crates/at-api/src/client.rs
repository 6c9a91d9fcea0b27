//! # Remote Data Client
//!
//! The REST calls the app makes. Every call goes through
//! [`LoggingTransport`]; none is retried, and every failure is returned to
//! the caller as an [`ApiError`].

use std::sync::Arc;

use at_core::{
    ApiError, AsciiConversion, FilePart, HealthSnapshot, HttpRequest, HttpResponse, HttpTransport,
    ImageUpload, MultipartForm, NewPost, PodInfo, TimelineEntry,
};
use at_telemetry::LogEmitter;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::middleware::LoggingTransport;
use crate::wire::WireEntry;

pub const TWEETS_PATH: &str = "/tweets";
pub const ASCII_GALLERY_PATH: &str = "/ascii-all";
pub const CREATE_POST_PATH: &str = "/tweet";
pub const UPLOAD_IMAGE_PATH: &str = "/upload-image";
pub const HEALTH_PATH: &str = "/health";
pub const POD_INFO_PATH: &str = "/frontend-info";

pub const POD_NAME_HEADER: &str = "X-Pod-Name";
pub const POD_IP_HEADER: &str = "X-Pod-IP";

pub struct ApiClient {
    base_url: String,
    transport: LoggingTransport,
}

impl ApiClient {
    /// `transport` is wrapped in request logging; callers pass the bare one.
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>, log: LogEmitter) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport: LoggingTransport::new(transport, log),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /tweets`, newest first as ordered by the server.
    pub async fn list_timeline(&self) -> Result<Vec<TimelineEntry>, ApiError> {
        let entries = self.list(TWEETS_PATH, false).await?;
        tracing::debug!(count = entries.len(), "timeline fetched");
        Ok(entries)
    }

    /// `GET /ascii-all`, the legacy gallery.
    pub async fn list_ascii_gallery(&self) -> Result<Vec<TimelineEntry>, ApiError> {
        let entries = self.list(ASCII_GALLERY_PATH, true).await?;
        tracing::debug!(count = entries.len(), "ascii gallery fetched");
        Ok(entries)
    }

    /// `POST /tweet`; returns the entry as the server stored it.
    pub async fn create_post(&self, post: &NewPost) -> Result<TimelineEntry, ApiError> {
        let body = serde_json::to_value(post).map_err(|e| ApiError::Request(e.to_string()))?;
        let resp = self
            .call(HttpRequest::post_json(self.url(CREATE_POST_PATH), body))
            .await?;
        let wire: WireEntry = decode(resp.body, "created post")?;
        Ok(wire.into_entry(false))
    }

    /// `POST /upload-image` (multipart); returns the converted ASCII art.
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<AsciiConversion, ApiError> {
        let form = MultipartForm::default()
            .text("author", upload.author.clone())
            .text("category", upload.category.clone())
            .file(FilePart {
                field_name: "file".into(),
                file_name: upload.file_name.clone(),
                content_type: upload.content_type.clone(),
                data: upload.data.clone(),
            });
        let resp = self
            .call(HttpRequest::post_multipart(self.url(UPLOAD_IMAGE_PATH), form))
            .await?;
        decode(resp.body, "image conversion")
    }

    /// `GET /health`.
    pub async fn fetch_health(&self) -> Result<HealthSnapshot, ApiError> {
        let resp = self.call(HttpRequest::get(self.url(HEALTH_PATH))).await?;
        decode(resp.body, "health snapshot")
    }

    /// `GET /frontend-info`, including the pod headers of the response.
    pub async fn fetch_pod_info(&self) -> Result<PodInfo, ApiError> {
        let resp = self.call(HttpRequest::get(self.url(POD_INFO_PATH))).await?;
        let header_pod_name = resp.header(POD_NAME_HEADER).map(str::to_string);
        let header_pod_ip = resp.header(POD_IP_HEADER).map(str::to_string);
        let mut info: PodInfo = decode(resp.body, "pod info")?;
        info.header_pod_name = header_pod_name;
        info.header_pod_ip = header_pod_ip;
        Ok(info)
    }

    async fn list(&self, path: &str, gallery: bool) -> Result<Vec<TimelineEntry>, ApiError> {
        let resp = self.call(HttpRequest::get(self.url(path))).await?;
        let wire: Vec<WireEntry> = decode(resp.body, "timeline")?;
        Ok(wire.into_iter().map(|w| w.into_entry(gallery)).collect())
    }

    async fn call(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport
            .send(request.with_header("Accept", "application/json"))
            .await
    }
}

fn decode<T: DeserializeOwned>(body: Option<Value>, what: &str) -> Result<T, ApiError> {
    let body = body.ok_or_else(|| ApiError::Decode(format!("{what}: empty response body")))?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(format!("{what}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use at_core::{EntryKind, MockHttpTransport, Method, RequestBody};
    use at_telemetry::MemorySink;
    use bytes::Bytes;
    use serde_json::json;

    fn client(mock: MockHttpTransport) -> (ApiClient, MemorySink) {
        let sink = MemorySink::new();
        let log = LogEmitter::with_sink(Arc::new(sink.clone()));
        (ApiClient::new("http://api.test/", Arc::new(mock), log), sink)
    }

    #[tokio::test]
    async fn list_timeline_gets_tweets() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| r.method == Method::Get && r.url == "http://api.test/tweets")
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::json(
                    200,
                    json!([
                        {"id": "b", "tweet": "second", "like": 2, "rt": 0},
                        {"id": "a", "tweet": "first", "like": 9, "rt": 3}
                    ]),
                ))
            });
        let (client, sink) = client(mock);

        let entries = client.list_timeline().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].body, "second");
        assert_eq!(entries[1].retweets, 3);
        assert_eq!(sink.events("http_request_start").len(), 1);
        assert_eq!(sink.events("http_request_success").len(), 1);
    }

    #[tokio::test]
    async fn non_array_timeline_is_a_decode_failure() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .returning(|_| Ok(HttpResponse::json(200, json!({"items": []}))));
        let (client, _) = client(mock);

        let err = client.list_timeline().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn gallery_entries_are_tagged() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| r.url.ends_with("/ascii-all"))
            .returning(|_| Ok(HttpResponse::json(200, json!([{"id": 1, "tweet": "art"}]))));
        let (client, _) = client(mock);

        let entries = client.list_ascii_gallery().await.unwrap();
        assert_eq!(entries[0].kind, EntryKind::AsciiArt);
    }

    #[tokio::test]
    async fn create_post_sends_json_and_decodes_echo() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| {
                r.method == Method::Post
                    && r.url == "http://api.test/tweet"
                    && r.body
                        == RequestBody::Json(json!({
                            "content": "hello", "author": "u", "category": "c"
                        }))
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::json(
                    200,
                    json!({"id": "1", "tweet": "hello", "like": 0, "rt": 0}),
                ))
            });
        let (client, _) = client(mock);

        let entry = client
            .create_post(&NewPost {
                content: "hello".into(),
                author: "u".into(),
                category: "c".into(),
                ascii_content: None,
            })
            .await
            .unwrap();
        assert_eq!(entry.body, "hello");
        assert_eq!((entry.likes, entry.retweets), (0, 0));
    }

    #[tokio::test]
    async fn upload_builds_multipart_form() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| match &r.body {
                RequestBody::Multipart(form) => {
                    r.url.ends_with("/upload-image")
                        && form.fields
                            == vec![
                                ("author".to_string(), "u".to_string()),
                                ("category".to_string(), "画像変換".to_string()),
                            ]
                        && form.file.as_ref().is_some_and(|f| {
                            f.field_name == "file" && f.file_name == "cat.png" && f.data.len() == 3
                        })
                }
                _ => false,
            })
            .returning(|_| {
                Ok(HttpResponse::json(
                    201,
                    json!({"id": "z", "ascii_content": "@@", "original_image": "cat.png"}),
                ))
            });
        let (client, _) = client(mock);

        let conversion = client
            .upload_image(&ImageUpload {
                file_name: "cat.png".into(),
                content_type: "image/png".into(),
                data: Bytes::from_static(&[1, 2, 3]),
                author: "u".into(),
                category: "画像変換".into(),
            })
            .await
            .unwrap();
        assert_eq!(conversion.ascii_content, "@@");
        assert_eq!(conversion.original_image.as_deref(), Some("cat.png"));
    }

    #[tokio::test]
    async fn pod_info_reads_headers() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().returning(|_| {
            Ok(HttpResponse::json(
                200,
                json!({"pod_name": "web-1", "pod_ip": "10.0.0.4", "node_name": "n1",
                       "client_ip": "1.2.3.4", "environment": "cluster"}),
            )
            .with_header("x-pod-name", "web-1")
            .with_header("x-pod-ip", "10.0.0.4"))
        });
        let (client, _) = client(mock);

        let info = client.fetch_pod_info().await.unwrap();
        assert_eq!(info.pod_name, "web-1");
        assert_eq!(info.header_pod_name.as_deref(), Some("web-1"));
        assert_eq!(info.header_pod_ip.as_deref(), Some("10.0.0.4"));
    }

    #[tokio::test]
    async fn status_errors_pass_through_untouched() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 500,
                message: "boom".into(),
            })
        });
        let (client, sink) = client(mock);

        let err = client.fetch_health().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(sink.events("http_request_error").len(), 1);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let (client, _) = client(MockHttpTransport::new());
        assert_eq!(client.base_url(), "http://api.test");
        assert_eq!(client.url(HEALTH_PATH), "http://api.test/health");
    }
}

//! The timeline page: feed, compose form, and the user actions that tie
//! them to the API client.

use at_api::ApiClient;
use at_core::{ApiError, EntryId, ImageUpload, NewPost, TimelineEntry};

use crate::compose::ComposeForm;
use crate::timeline::Timeline;

#[derive(Debug, Default)]
pub struct TimelinePage {
    pub timeline: Timeline,
    pub compose: ComposeForm,
}

impl TimelinePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page load / refresh. On failure the previous entries stay visible.
    pub async fn load(&mut self, client: &ApiClient) {
        self.timeline.begin_load();
        match client.list_timeline().await {
            Ok(entries) => self.timeline.replace_all(entries),
            Err(err) => {
                tracing::warn!(error = %err, "timeline load failed");
                self.timeline.fail_load(err.user_message());
            }
        }
    }

    /// Loads the legacy ASCII gallery into the feed.
    pub async fn load_gallery(&mut self, client: &ApiClient) {
        self.timeline.begin_load();
        match client.list_ascii_gallery().await {
            Ok(entries) => self.timeline.replace_all(entries),
            Err(err) => {
                tracing::warn!(error = %err, "gallery load failed");
                self.timeline.fail_load(err.user_message());
            }
        }
    }

    /// Posts the compose form and waits for the reply. Returns `false` if
    /// nothing was sent.
    ///
    /// Holds the page for the whole round trip. Hosts that keep handling
    /// clicks meanwhile use [`TimelinePage::begin_submit`], await
    /// `ApiClient::create_post` themselves, then call
    /// [`TimelinePage::complete_submit`].
    pub async fn submit(&mut self, client: &ApiClient) -> bool {
        let Some(post) = self.begin_submit() else {
            return false;
        };
        let outcome = client.create_post(&post).await;
        self.complete_submit(outcome);
        true
    }

    /// Payload to send, or `None` if a submission is pending or the form
    /// is blank.
    pub fn begin_submit(&mut self) -> Option<NewPost> {
        self.compose.begin_submit()
    }

    /// Applies the server's answer to a submission started with
    /// [`TimelinePage::begin_submit`].
    pub fn complete_submit(&mut self, outcome: Result<TimelineEntry, ApiError>) {
        match outcome {
            Ok(entry) => {
                self.compose.finish_submit(Ok(()));
                self.timeline.prepend(entry);
            }
            Err(err) => {
                tracing::warn!(error = %err, "post submission failed");
                self.compose.finish_submit(Err(&err));
            }
        }
    }

    /// Sends an image for conversion and attaches the art to the form.
    /// Never adds an entry to the feed. Returns `false` if nothing was sent.
    pub async fn upload_image(&mut self, client: &ApiClient, upload: &ImageUpload) -> bool {
        if !self.compose.begin_upload() {
            return false;
        }
        match client.upload_image(upload).await {
            Ok(conversion) => self.compose.finish_upload(Ok(conversion)),
            Err(err) => {
                tracing::warn!(error = %err, file = %upload.file_name, "image upload failed");
                self.compose.finish_upload(Err(&err));
            }
        }
        true
    }

    // Counter clicks stay local; the backend has no endpoint for them.
    pub fn like(&mut self, id: &EntryId) -> Option<u64> {
        self.timeline.like(id)
    }

    pub fn retweet(&mut self, id: &EntryId) -> Option<u64> {
        self.timeline.retweet(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use at_core::{HttpResponse, MockHttpTransport};
    use at_telemetry::{LogEmitter, MemorySink};
    use bytes::Bytes;
    use serde_json::json;

    fn client(mock: MockHttpTransport) -> ApiClient {
        let log = LogEmitter::with_sink(Arc::new(MemorySink::new()));
        ApiClient::new("http://api.test", Arc::new(mock), log)
    }

    #[tokio::test]
    async fn successful_post_is_prepended_and_form_cleared() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .withf(|r| r.url.ends_with("/tweets"))
            .times(1)
            .returning(|_| Ok(HttpResponse::json(200, json!([{"id": "old", "tweet": "x"}]))));
        mock.expect_send()
            .withf(|r| r.url.ends_with("/tweet"))
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::json(
                    200,
                    json!({"id": "1", "tweet": "hello", "like": 0, "rt": 0,
                           "timestamp": "2025-07-01T10:00:00Z"}),
                ))
            });
        let client = client(mock);
        let mut page = TimelinePage::new();

        page.load(&client).await;
        page.compose.content = "hello".into();
        assert!(page.submit(&client).await);

        assert_eq!(page.timeline.len(), 2);
        assert_eq!(page.timeline.first().unwrap().entry.id, EntryId::from("1"));
        assert!(page.compose.content.is_empty());
        assert!(!page.compose.is_submitting());
    }

    #[tokio::test]
    async fn failed_post_leaves_timeline_and_text() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .times(1)
            .returning(|_| Err(ApiError::Status { status: 500, message: "boom".into() }));
        let client = client(mock);
        let mut page = TimelinePage::new();
        page.compose.content = "retry me".into();

        assert!(page.submit(&client).await);
        assert!(page.timeline.is_empty());
        assert_eq!(page.compose.content, "retry me");
        assert_eq!(page.compose.error(), Some("HTTP 500: boom"));
    }

    #[tokio::test]
    async fn empty_form_sends_nothing() {
        let client = client(MockHttpTransport::new());
        let mut page = TimelinePage::new();
        assert!(!page.submit(&client).await);
    }

    #[tokio::test]
    async fn failed_load_surfaces_error() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send()
            .returning(|_| Err(ApiError::Network("connection refused".into())));
        let client = client(mock);
        let mut page = TimelinePage::new();

        page.load(&client).await;
        assert!(page.timeline.is_empty());
        assert!(page.timeline.error().is_some());
        assert!(!page.timeline.is_loading());
    }

    #[tokio::test]
    async fn upload_never_touches_the_feed() {
        let mut mock = MockHttpTransport::new();
        mock.expect_send().times(1).returning(|_| {
            Ok(HttpResponse::json(
                201,
                json!({"id": "img", "ascii_content": "%%", "original_image": "a.png"}),
            ))
        });
        let client = client(mock);
        let mut page = TimelinePage::new();
        let upload = ImageUpload {
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            data: Bytes::from_static(b"\x89PNG"),
            author: "u".into(),
            category: "画像変換".into(),
        };

        assert!(page.upload_image(&client, &upload).await);
        assert!(page.timeline.is_empty());
        assert_eq!(page.compose.ascii_content.as_deref(), Some("%%"));
    }
}

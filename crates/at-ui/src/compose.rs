//! Compose form and its submission state machine.
//!
//! `idle -> submitting -> idle`. While a submission is pending, further
//! submissions are refused. Success clears what was sent (text or art
//! changed in the meantime stays); failure leaves the text in place so the
//! user can retry by hand.

use at_core::{ApiError, AsciiConversion, NewPost};

pub const DEFAULT_AUTHOR: &str = "ユーザー";
pub const DEFAULT_CATEGORY: &str = "ユーザー投稿";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposeForm {
    pub content: String,
    pub author: String,
    pub category: String,
    /// ASCII art attached from an image upload, sent with the next post.
    pub ascii_content: Option<String>,
    phase: SubmitPhase,
    /// Payload of the submission in flight.
    sent: Option<NewPost>,
    uploading: bool,
    error: Option<String>,
}

impl Default for ComposeForm {
    fn default() -> Self {
        Self {
            content: String::new(),
            author: DEFAULT_AUTHOR.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            ascii_content: None,
            phase: SubmitPhase::Idle,
            sent: None,
            uploading: false,
            error: None,
        }
    }
}

impl ComposeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enters `Submitting` and returns the payload to send, or `None` when a
    /// submission is already pending or there is nothing to post.
    pub fn begin_submit(&mut self) -> Option<NewPost> {
        if self.is_submitting() {
            tracing::debug!("submission already pending; ignoring");
            return None;
        }
        if self.content.trim().is_empty() && self.ascii_content.is_none() {
            return None;
        }
        self.phase = SubmitPhase::Submitting;
        self.error = None;
        let post = NewPost {
            content: self.content.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            ascii_content: self.ascii_content.clone(),
        };
        self.sent = Some(post.clone());
        Some(post)
    }

    /// Leaves `Submitting`. On success the text and attachment are cleared
    /// if they are still what was sent.
    pub fn finish_submit(&mut self, outcome: Result<(), &ApiError>) {
        self.phase = SubmitPhase::Idle;
        let sent = self.sent.take();
        match outcome {
            Ok(()) => {
                if let Some(sent) = sent {
                    if self.content == sent.content {
                        self.content.clear();
                    }
                    if self.ascii_content == sent.ascii_content {
                        self.ascii_content = None;
                    }
                }
                self.error = None;
            }
            Err(err) => self.error = Some(err.user_message()),
        }
    }

    /// Returns `false` if an upload is already running.
    pub fn begin_upload(&mut self) -> bool {
        if self.uploading {
            return false;
        }
        self.uploading = true;
        self.error = None;
        true
    }

    pub fn finish_upload(&mut self, outcome: Result<AsciiConversion, &ApiError>) {
        self.uploading = false;
        match outcome {
            Ok(conversion) => self.ascii_content = Some(conversion.ascii_content),
            Err(err) => self.error = Some(err.user_message()),
        }
    }
}

//! Backend JSON shapes and their mapping onto `at_core` models.
//!
//! The backend returns near-identical objects from `/tweets`, `/tweet`,
//! `/upload-image` and `/ascii-all`. They are decoded into one loose DTO
//! and resolved into a tagged `TimelineEntry` here, so nothing downstream
//! checks for optional keys.

use at_core::{EntryId, EntryKind, TimelineEntry};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct WireEntry {
    id: EntryId,
    #[serde(default)]
    tweet: Option<String>,
    #[serde(default)]
    ascii_content: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    like: Option<u64>,
    #[serde(default)]
    rt: Option<u64>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    ascii: Option<String>,
    #[serde(default)]
    original_image: Option<String>,
}

impl WireEntry {
    /// `gallery` marks entries listed by `/ascii-all`.
    pub(crate) fn into_entry(self, gallery: bool) -> TimelineEntry {
        let kind = if gallery {
            EntryKind::AsciiArt
        } else if self.original_image.is_some() {
            EntryKind::ImageConversion
        } else {
            EntryKind::Post
        };

        TimelineEntry {
            id: self.id,
            kind,
            title: self.title.unwrap_or_default(),
            body: self.tweet.or(self.ascii_content).unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            likes: self.like.unwrap_or(0),
            retweets: self.rt.unwrap_or(0),
            timestamp: self.timestamp.filter(|t| !t.trim().is_empty()),
            filename: self.filename,
            ascii_path: self.ascii,
            original_image: self.original_image,
        }
    }
}

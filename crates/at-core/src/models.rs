//! # Domain Models
//!
//! These structs represent the entities the client fetches and displays.
//! Wire-format quirks are resolved in `at-api`; nothing here knows about
//! the backend's field names except where serde renames say so.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Opaque post identifier. The backend hands out UUID strings for posts
/// and small integers for the legacy ASCII gallery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{n}"),
            EntryId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId::Text(value.to_string())
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        EntryId::Number(value)
    }
}

/// Where an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A text post, optionally carrying pre-converted ASCII art.
    Post,
    /// An item of the legacy ASCII gallery (`/ascii-all`).
    AsciiArt,
    /// A post produced server-side from an uploaded image.
    ImageConversion,
}

/// One post in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub title: String,
    /// Text body, with any ASCII art appended.
    pub body: String,
    pub category: String,
    pub author: String,
    /// Only ever incremented on the client.
    pub likes: u64,
    /// Only ever incremented on the client.
    pub retweets: u64,
    /// Server timestamp (ISO-8601) if the backend sent one.
    pub timestamp: Option<String>,
    pub filename: Option<String>,
    /// Server-side path of the stored ASCII art, if any.
    pub ascii_path: Option<String>,
    /// Name of the uploaded image an `ImageConversion` entry was built from.
    pub original_image: Option<String>,
}

/// Payload of a "create post" call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascii_content: Option<String>,
}

/// An image selected for server-side ASCII conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub data: Bytes,
    pub author: String,
    pub category: String,
}

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsciiConversion {
    pub ascii_content: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub hostname: String,
    pub pod_name: String,
    pub node_name: String,
    pub environment: String,
    pub python_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiArtStats {
    pub files_count: u64,
    pub total_size_bytes: u64,
    pub directory_exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryInfo {
    pub available_mb: f64,
}

/// One `/health` reply. Rebuilt on every check, never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSnapshot {
    pub status: HealthStatus,
    pub timestamp: String,
    pub request_id: Option<String>,
    /// Server-measured handling time.
    pub response_time_ms: f64,
    pub system: SystemInfo,
    pub ascii_art: AsciiArtStats,
    pub memory: MemoryInfo,
}

impl HealthSnapshot {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// The `/frontend-info` body plus the pod headers of the same response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodInfo {
    #[serde(default)]
    pub pod_name: String,
    #[serde(default)]
    pub pod_ip: String,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub client_ip: String,
    #[serde(default)]
    pub environment: String,
    /// Value of the `X-Pod-Name` response header.
    #[serde(skip)]
    pub header_pod_name: Option<String>,
    /// Value of the `X-Pod-IP` response header.
    #[serde(skip)]
    pub header_pod_ip: Option<String>,
}

//! # Timeline View-State
//!
//! Ordered, most-recent-first list of entries plus the load status the
//! page shows around it. Mutated only from the task that owns it.

use std::collections::HashSet;
use std::fmt;

use at_core::{EntryId, TimelineEntry};
use rand::Rng;

/// Synthetic labels are drawn uniformly from this range of minutes.
pub const SYNTHETIC_MINUTES: std::ops::RangeInclusive<u8> = 1..=59;

/// The time label shown next to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayTime {
    /// Timestamp sent by the server.
    Server(String),
    /// Placeholder for entries without a timestamp. Presentation only:
    /// not derived from any clock and never sent back to the server.
    Synthetic { minutes_ago: u8 },
    /// A post this client just created that came back without a timestamp.
    JustNow,
}

impl fmt::Display for DisplayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayTime::Server(ts) => f.write_str(ts),
            DisplayTime::Synthetic { minutes_ago } => write!(f, "{minutes_ago} minutes ago"),
            DisplayTime::JustNow => f.write_str("just now"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineItem {
    pub entry: TimelineEntry,
    pub display_time: DisplayTime,
}

#[derive(Debug, Default)]
pub struct Timeline {
    items: Vec<TimelineItem>,
    loading: bool,
    error: Option<String>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&TimelineItem> {
        self.items.first()
    }

    pub fn get(&self, id: &EntryId) -> Option<&TimelineItem> {
        self.items.iter().find(|i| &i.entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks a bulk load as in flight. Existing items stay visible.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// A failed load keeps whatever was displayed and shows `message`.
    pub fn fail_load(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Replaces the whole list with a server snapshot.
    pub fn replace_all(&mut self, entries: Vec<TimelineEntry>) {
        self.replace_all_with(entries, &mut rand::thread_rng());
    }

    /// As [`Timeline::replace_all`], drawing synthetic labels from `rng`.
    ///
    /// Server order is kept. A repeated id keeps its first occurrence.
    pub fn replace_all_with<R: Rng + ?Sized>(&mut self, entries: Vec<TimelineEntry>, rng: &mut R) {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.id.clone()) {
                tracing::debug!(id = %entry.id, "dropping duplicate timeline entry");
                continue;
            }
            let display_time = match &entry.timestamp {
                Some(ts) => DisplayTime::Server(ts.clone()),
                None => DisplayTime::Synthetic {
                    minutes_ago: rng.gen_range(SYNTHETIC_MINUTES),
                },
            };
            items.push(TimelineItem {
                entry,
                display_time,
            });
        }
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// Puts a server-acknowledged post at the head. An older copy with the
    /// same id is removed first.
    pub fn prepend(&mut self, entry: TimelineEntry) {
        self.items.retain(|i| i.entry.id != entry.id);
        let display_time = match &entry.timestamp {
            Some(ts) => DisplayTime::Server(ts.clone()),
            None => DisplayTime::JustNow,
        };
        self.items.insert(
            0,
            TimelineItem {
                entry,
                display_time,
            },
        );
    }

    /// Local-only like. Returns the new count, or `None` for an unknown id.
    pub fn like(&mut self, id: &EntryId) -> Option<u64> {
        let entry = self.entry_mut(id)?;
        entry.likes = entry.likes.saturating_add(1);
        Some(entry.likes)
    }

    /// Local-only retweet. Returns the new count, or `None` for an unknown id.
    pub fn retweet(&mut self, id: &EntryId) -> Option<u64> {
        let entry = self.entry_mut(id)?;
        entry.retweets = entry.retweets.saturating_add(1);
        Some(entry.retweets)
    }

    fn entry_mut(&mut self, id: &EntryId) -> Option<&mut TimelineEntry> {
        self.items
            .iter_mut()
            .find(|i| &i.entry.id == id)
            .map(|i| &mut i.entry)
    }
}

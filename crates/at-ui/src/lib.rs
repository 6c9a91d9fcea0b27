//! # at-ui
//!
//! View state for the ascii-twitter pages. Rendering is left to the host;
//! these types hold what a page shows and apply user actions to it.

pub mod compose;
pub mod health;
pub mod page;
pub mod pod_info;
pub mod timeline;

pub use compose::{ComposeForm, SubmitPhase};
pub use health::HealthPanel;
pub use page::TimelinePage;
pub use pod_info::PodInfoPanel;
pub use timeline::{DisplayTime, Timeline, TimelineItem};

// crates/folio-discovery/src/platform/mod.rs
// Thin platform seam over the rendered page: element lookup, location, frames.
// A browser host implements these over the DOM; `memory` backs the CLI and tests.

mod frames;
pub mod memory;

use crate::filter::SectionType;
use std::sync::Arc;

pub use frames::{FrameScheduler, FrameTask, ImmediateFrames, ManualFrames, TokioFrames};
pub use memory::{MemoryControl, MemoryItem, MemoryPage, MemoryText};

/// A clickable filter control carrying a tag ID
pub trait FilterControl: Send + Sync {
    /// Tag ID from the control's data attribute
    fn tag_id(&self) -> Option<String>;

    /// Reflect pressed state on the control and active styling on its label
    fn set_active(&self, active: bool);
}

/// A candidate content entry in a section listing
pub trait ItemElement: Send + Sync {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_visible(&self, visible: bool);
}

pub trait TextElement: Send + Sync {
    fn set_text(&self, text: &str);
}

/// The page anchors a filter session binds to
pub trait FilterPage: Send + Sync {
    /// Controls inside the filter container; `None` when the container is absent
    fn filter_controls(&self) -> Option<Vec<Arc<dyn FilterControl>>>;

    fn has_clear_control(&self) -> bool;

    fn results_count(&self) -> Option<Arc<dyn TextElement>>;

    /// Fixed item collection for a section, in document order
    fn items(&self, section: &SectionType) -> Vec<Arc<dyn ItemElement>>;

    /// Current absolute location
    fn location(&self) -> String;

    /// Replace the current history entry's URL without adding a new one
    fn replace_location(&self, url: &str);
}

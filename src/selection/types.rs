//! Data types for bulk selection
//!
//! These are pure data structures. The selection manager keys everything by
//! the item's file path, which stays stable while the item scrolls in and out
//! of the rendered grid.

use serde::{Deserialize, Serialize};

/// Unique key of a listing item (its file path)
pub type ItemKey = String;

/// Kind of media used as an item's preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl MediaKind {
    /// Guess the media kind from a preview URL's extension
    #[must_use]
    pub fn from_preview_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let lower = path.to_ascii_lowercase();
        if [".mp4", ".webm", ".mov"].iter().any(|ext| lower.ends_with(ext)) {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// What the grid shows about an item, captured while it is rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemSnapshot {
    /// Name used in copied text (the file name without extension)
    pub display_name: String,
    pub preview_url: String,
    pub media_kind: MediaKind,
    /// Raw usage tips, e.g. `{"strength": 0.8}`
    pub usage_hint: Option<String>,
}

/// An item currently present in the rendered grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub key: ItemKey,
    pub snapshot: ItemSnapshot,
}

impl RenderedItem {
    #[must_use]
    pub fn new(key: impl Into<ItemKey>, snapshot: ItemSnapshot) -> Self {
        Self {
            key: key.into(),
            snapshot,
        }
    }
}

/// One thumbnail in the selected-items preview strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripItem {
    pub key: ItemKey,
    pub display_name: String,
    pub preview_url: String,
    pub media_kind: MediaKind,
}

//! Bulk selection module
//!
//! Selection mode lets the user pick LoRAs across pages of the grid and act on
//! them together (copy as prompt text, preview, deselect).
//!
//! # Architecture
//!
//! - `types`: keys, metadata snapshots, strip items
//! - `view`: the `GridView` seam and the in-memory `HeadlessGrid`
//! - `copy`: prompt-token formatting and strength parsing
//! - `manager`: `SelectionManager`, owner of the selection and metadata cache

pub mod copy;
pub mod manager;
pub mod types;
pub mod view;

pub use copy::{CopyOutcome, CopyReport, DEFAULT_STRENGTH, format_lora_token, parse_strength};
pub use manager::{DEFAULT_REVEAL_DELAY, SelectionManager};
pub use types::{ItemKey, ItemSnapshot, MediaKind, RenderedItem, StripItem};
pub use view::{GridView, HeadlessGrid};

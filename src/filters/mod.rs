//! Filter management module
//!
//! This module keeps the active filter criteria of each listing view (LoRAs,
//! recipes, checkpoints) synchronized across the filter panel, durable storage
//! and the listing itself.
//!
//! # Features
//!
//! - **One manager, many views**: `FilterManager` is parameterised by a
//!   `ContextDescriptor` instead of being duplicated per view
//! - **Durable criteria**: criteria are restored at construction and written on
//!   every change under a per-context key
//! - **Sequenced reloads**: every reload carries a ticket; results of
//!   superseded reloads are dropped
//! - **Soft failures**: fetch and reload errors end up as inline errors or
//!   notifications, never as errors returned to the caller
//!
//! # Storage
//!
//! Criteria are stored as JSON (`{"tags": [...], "baseModel": [...]}`) under
//! `lora_manager_<context>_filters`.

pub mod context;
pub mod error;
pub mod manager;
pub mod panel;
pub mod reload;
pub mod source;
pub mod types;

pub use context::{ContextDescriptor, FilterContext, ListingContext};
pub use error::{FilterError, NavigateError, ReloadError};
pub use manager::{DEFAULT_TAG_LIMIT, FilterDeps, FilterManager};
pub use panel::{
    ClickTarget, FilterPanel, PanelAnchor, PanelPosition, PanelState, Rect, TagToggle, ToggleGroup,
};
pub use reload::{
    ApplyOutcome, ListingReloader, ReloadJob, ReloadOutcome, ReloadRequest, ReloadSequencer,
    ReloadTicket, RenderObserver,
};
pub use source::TagSource;
pub use types::{
    BaseModelCount, BaseModelListResponse, FilterCriteria, FilterCriteriaBuilder, TagCount,
    TagKind, TagListResponse,
};

//! Bulk selection manager
//!
//! Owns the set of selected keys and the metadata cache that lets selected
//! items be copied or previewed after they scroll out of the grid.
//!
//! # Invariants
//!
//! - A key is in the selection iff the user selected it, rendered or not.
//! - After every operation, each rendered item's marker matches membership.
//! - The preview strip is never visible while the selection is empty.

use super::copy::{CopyOutcome, CopyReport, format_lora_token, parse_strength};
use super::types::{ItemKey, ItemSnapshot, RenderedItem, StripItem};
use super::view::GridView;
use crate::clipboard::ClipboardWriter;
use crate::filters::RenderObserver;
use crate::notify::{Notifier, Severity};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Default delay before the bulk-action panel is revealed
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(100);

/// Selection state for one item grid
pub struct SelectionManager<V> {
    view: V,
    selected: BTreeSet<ItemKey>,
    metadata: HashMap<ItemKey, ItemSnapshot>,
    active: bool,
    strip_visible: bool,
    reveal_delay: Duration,
    clipboard: Arc<dyn ClipboardWriter>,
    notifier: Arc<dyn Notifier>,
}

impl<V: GridView> SelectionManager<V> {
    /// Create a manager over `view` with an empty selection
    #[must_use]
    pub fn new(view: V, clipboard: Arc<dyn ClipboardWriter>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            view,
            selected: BTreeSet::new(),
            metadata: HashMap::new(),
            active: false,
            strip_visible: false,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            clipboard,
            notifier,
        }
    }

    /// Set the delay before the action panel is revealed
    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    #[must_use]
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access for re-rendering the grid
    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Whether selection mode is on
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    /// Selected keys in key order
    pub fn selected_keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.selected.iter()
    }

    /// Cached metadata for a key, stale or not
    #[must_use]
    pub fn snapshot_for(&self, key: &str) -> Option<&ItemSnapshot> {
        self.metadata.get(key)
    }

    /// Turn selection mode on
    ///
    /// Reveals the action panel and hides the per-item actions of every
    /// rendered item.
    pub fn enter_selection_mode(&mut self) {
        self.active = true;
        self.view.show_action_panel(self.reveal_delay);
        self.sync_item_actions();
        debug!("entered selection mode");
    }

    /// Turn selection mode off and drop the selection
    pub fn exit_selection_mode(&mut self) {
        self.active = false;
        self.view.hide_action_panel();
        self.sync_item_actions();
        self.clear_selection();
        debug!("exited selection mode");
    }

    /// Enter selection mode if off, exit it if on
    pub fn toggle_selection_mode(&mut self) {
        if self.active {
            self.exit_selection_mode();
        } else {
            self.enter_selection_mode();
        }
    }

    fn sync_item_actions(&mut self) {
        let visible = !self.active;
        for item in self.view.rendered_items() {
            self.view.set_item_actions_visible(&item.key, visible);
        }
    }

    /// Flip an item's membership; returns whether it is selected afterwards
    pub fn toggle_item_selection(&mut self, item: &RenderedItem) -> bool {
        let selected = if self.selected.remove(&item.key) {
            false
        } else {
            self.selected.insert(item.key.clone());
            self.metadata
                .insert(item.key.clone(), item.snapshot.clone());
            true
        };

        self.view.set_selected_marker(&item.key, selected);
        self.after_membership_change();
        debug!(key = %item.key, selected, "toggled item selection");
        selected
    }

    /// Re-apply markers and refresh the cache after the grid re-rendered
    ///
    /// Does nothing outside selection mode.
    pub fn reapply_selection_on_render(&mut self) {
        if !self.active {
            return;
        }

        for item in self.view.rendered_items() {
            let selected = self.selected.contains(&item.key);
            self.view.set_selected_marker(&item.key, selected);
            self.view.set_item_actions_visible(&item.key, false);
            if selected {
                self.metadata.insert(item.key, item.snapshot);
            }
        }
        self.view.set_selected_count(self.selected.len());
    }

    /// Deselect everything and collapse the preview strip
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        for item in self.view.rendered_items() {
            self.view.set_selected_marker(&item.key, false);
        }
        self.view.set_selected_count(0);
        self.strip_visible = false;
    }

    fn after_membership_change(&mut self) {
        self.view.set_selected_count(self.selected.len());
        if self.selected.is_empty() {
            self.strip_visible = false;
        }
    }

    /// Copy `<lora:NAME:STRENGTH>` tokens for the selection to the clipboard
    ///
    /// Every outcome is reported through the notifier; the returned report
    /// describes what happened.
    pub async fn copy_selected_as_text(&self) -> CopyReport {
        if self.selected.is_empty() {
            self.notifier.notify("No LoRAs selected", Severity::Error);
            return CopyReport {
                outcome: CopyOutcome::NothingSelected,
                tokens: Vec::new(),
                missing: Vec::new(),
            };
        }

        let mut tokens = Vec::with_capacity(self.selected.len());
        let mut missing = Vec::new();
        for key in &self.selected {
            match self.metadata.get(key) {
                Some(snapshot) => tokens.push(format_lora_token(
                    &snapshot.display_name,
                    parse_strength(snapshot.usage_hint.as_deref()),
                )),
                None => missing.push(key.clone()),
            }
        }

        if !missing.is_empty() {
            warn!(missing = ?missing, "selected items without cached metadata");
            let noun = if missing.len() == 1 { "item" } else { "items" };
            self.notifier.notify(
                &format!("Missing metadata for {} selected {noun}", missing.len()),
                Severity::Warning,
            );
        }

        if tokens.is_empty() {
            self.notifier.notify("No valid LoRAs to copy", Severity::Error);
            return CopyReport {
                outcome: CopyOutcome::NothingValid,
                tokens,
                missing,
            };
        }

        let text = tokens.join(super::copy::TOKEN_SEPARATOR);
        let outcome = match self.clipboard.write_text(&text).await {
            Ok(()) => {
                self.notifier.notify(
                    &format!("Copied {} LoRA syntax to clipboard", tokens.len()),
                    Severity::Success,
                );
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!(error = %e, "clipboard write failed");
                self.notifier
                    .notify(&format!("Copy failed: {e}"), Severity::Error);
                CopyOutcome::ClipboardFailed(e.to_string())
            }
        };

        CopyReport {
            outcome,
            tokens,
            missing,
        }
    }

    #[must_use]
    pub const fn is_strip_visible(&self) -> bool {
        self.strip_visible
    }

    /// Show the preview strip; ignored while nothing is selected
    pub fn show_selection_preview_strip(&mut self) {
        if !self.selected.is_empty() {
            self.strip_visible = true;
        }
    }

    pub fn hide_selection_preview_strip(&mut self) {
        self.strip_visible = false;
    }

    /// Flip strip visibility; ignored while nothing is selected
    pub fn toggle_selection_preview_strip(&mut self) {
        if self.strip_visible {
            self.hide_selection_preview_strip();
        } else {
            self.show_selection_preview_strip();
        }
    }

    /// Thumbnails for the preview strip, one per selected key with metadata
    #[must_use]
    pub fn strip_items(&self) -> Vec<StripItem> {
        self.selected
            .iter()
            .filter_map(|key| {
                self.metadata.get(key).map(|snapshot| StripItem {
                    key: key.clone(),
                    display_name: snapshot.display_name.clone(),
                    preview_url: snapshot.preview_url.clone(),
                    media_kind: snapshot.media_kind,
                })
            })
            .collect()
    }

    /// Deselect one key from the strip; the strip collapses when nothing is left
    pub fn remove_from_strip(&mut self, key: &str) {
        if self.selected.remove(key) {
            self.view.set_selected_marker(key, false);
            self.after_membership_change();
            debug!(key, "removed item from preview strip");
        }
    }
}

impl<V: GridView + Send> RenderObserver for Mutex<SelectionManager<V>> {
    fn on_listing_rendered(&self) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reapply_selection_on_render();
    }
}

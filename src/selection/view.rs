//! Grid view abstraction for the selection manager
//!
//! The selection manager never touches rendering directly. It reads which items
//! are rendered and pushes marker/affordance changes through [`GridView`].
//! [`HeadlessGrid`] is an in-memory implementation used by the terminal front
//! end and by tests.

use super::types::{ItemKey, RenderedItem};
use std::collections::HashSet;
use std::time::Duration;

/// The rendered part of a paginated/virtualized item grid
///
/// Methods taking a key must ignore keys that are not currently rendered.
pub trait GridView {
    /// Items currently rendered, in display order
    fn rendered_items(&self) -> Vec<RenderedItem>;

    /// Draw or clear an item's "selected" marker
    fn set_selected_marker(&mut self, key: &str, selected: bool);

    /// Show or hide an item's normal per-item actions
    fn set_item_actions_visible(&mut self, key: &str, visible: bool);

    /// Reveal the bulk-action panel after `reveal_delay`
    fn show_action_panel(&mut self, reveal_delay: Duration);

    fn hide_action_panel(&mut self);

    /// Update the selected-count indicator
    fn set_selected_count(&mut self, count: usize);
}

/// Grid state kept in memory
#[derive(Debug, Clone, Default)]
pub struct HeadlessGrid {
    items: Vec<RenderedItem>,
    markers: HashSet<ItemKey>,
    hidden_actions: HashSet<ItemKey>,
    action_panel: Option<Duration>,
    selected_count: usize,
}

impl HeadlessGrid {
    /// Create a grid rendering `items`
    #[must_use]
    pub fn new(items: Vec<RenderedItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Replace the rendered items, as a page change or scroll would
    ///
    /// Freshly rendered items start unmarked with their actions visible.
    pub fn render(&mut self, items: Vec<RenderedItem>) {
        self.items = items;
        self.markers.clear();
        self.hidden_actions.clear();
    }

    fn is_rendered(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    #[must_use]
    pub fn has_marker(&self, key: &str) -> bool {
        self.markers.contains(key)
    }

    #[must_use]
    pub fn actions_visible(&self, key: &str) -> bool {
        !self.hidden_actions.contains(key)
    }

    /// Keys with a marker, sorted
    #[must_use]
    pub fn marked_keys(&self) -> Vec<ItemKey> {
        let mut keys: Vec<ItemKey> = self.markers.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Reveal delay of the action panel, if shown
    #[must_use]
    pub const fn action_panel(&self) -> Option<Duration> {
        self.action_panel
    }

    #[must_use]
    pub const fn selected_count(&self) -> usize {
        self.selected_count
    }
}

impl GridView for HeadlessGrid {
    fn rendered_items(&self) -> Vec<RenderedItem> {
        self.items.clone()
    }

    fn set_selected_marker(&mut self, key: &str, selected: bool) {
        if !self.is_rendered(key) {
            return;
        }
        if selected {
            self.markers.insert(key.to_string());
        } else {
            self.markers.remove(key);
        }
    }

    fn set_item_actions_visible(&mut self, key: &str, visible: bool) {
        if !self.is_rendered(key) {
            return;
        }
        if visible {
            self.hidden_actions.remove(key);
        } else {
            self.hidden_actions.insert(key.to_string());
        }
    }

    fn show_action_panel(&mut self, reveal_delay: Duration) {
        self.action_panel = Some(reveal_delay);
    }

    fn hide_action_panel(&mut self) {
        self.action_panel = None;
    }

    fn set_selected_count(&mut self, count: usize) {
        self.selected_count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ItemSnapshot;

    #[test]
    fn test_unrendered_keys_are_ignored() {
        let mut grid = HeadlessGrid::new(vec![RenderedItem::new("a", ItemSnapshot::default())]);

        grid.set_selected_marker("b", true);
        grid.set_item_actions_visible("b", false);

        assert!(!grid.has_marker("b"));
        assert!(grid.actions_visible("b"));
    }

    #[test]
    fn test_render_resets_item_state() {
        let mut grid = HeadlessGrid::new(vec![RenderedItem::new("a", ItemSnapshot::default())]);
        grid.set_selected_marker("a", true);
        grid.set_item_actions_visible("a", false);

        grid.render(vec![RenderedItem::new("a", ItemSnapshot::default())]);

        assert!(!grid.has_marker("a"));
        assert!(grid.actions_visible("a"));
    }
}

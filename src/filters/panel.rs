//! Filter panel view model
//!
//! The panel is a plain `closed ⇄ open` state machine plus the toggle groups it
//! shows. It holds no criteria of its own: toggle visuals are always re-synced
//! from the manager's `FilterCriteria`.

use super::types::{FilterCriteria, TagKind};

/// Panel visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Where a click landed, relative to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    InsidePanel,
    ToggleButton,
    Elsewhere,
}

/// Screen rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Geometry measured when the panel opens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelAnchor {
    /// Bounding box of the filter button
    pub button: Rect,
    pub panel_width: f32,
    pub viewport_width: f32,
}

/// Computed panel placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPosition {
    pub top: f32,
    pub left: f32,
}

/// Vertical gap between the button and the panel
const PANEL_GAP: f32 = 5.0;

impl PanelAnchor {
    /// Place the panel under the button, kept inside the viewport
    #[must_use]
    pub fn position(&self) -> PanelPosition {
        let max_left = (self.viewport_width - self.panel_width).max(0.0);
        PanelPosition {
            top: self.button.top + self.button.height + PANEL_GAP,
            left: self.button.left.clamp(0.0, max_left),
        }
    }
}

/// One clickable tag in the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToggle {
    pub value: String,
    pub count: u64,
    pub active: bool,
}

/// Content of one toggle container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ToggleGroup {
    #[default]
    NotLoaded,
    Loaded(Vec<TagToggle>),
    /// Inline error shown in place of the toggles
    Failed(String),
}

impl ToggleGroup {
    /// Toggles of a loaded group (empty otherwise)
    #[must_use]
    pub fn toggles(&self) -> &[TagToggle] {
        match self {
            Self::Loaded(toggles) => toggles,
            _ => &[],
        }
    }
}

/// Everything the filter panel renders
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    state: PanelState,
    tags_loaded: bool,
    position: Option<PanelPosition>,
    categories: ToggleGroup,
    attributes: ToggleGroup,
    active_count: usize,
}

impl FilterPanel {
    #[must_use]
    pub const fn state(&self) -> PanelState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == PanelState::Open
    }

    /// Whether the first-open tag load has been triggered
    #[must_use]
    pub const fn tags_loaded(&self) -> bool {
        self.tags_loaded
    }

    #[must_use]
    pub const fn position(&self) -> Option<PanelPosition> {
        self.position
    }

    /// Value of the active-filter count badge
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    /// Toggle container for a kind
    #[must_use]
    pub const fn group(&self, kind: TagKind) -> &ToggleGroup {
        match kind {
            TagKind::Category => &self.categories,
            TagKind::Attribute => &self.attributes,
        }
    }

    /// Open the panel at the anchor; returns `true` if this is the first open
    pub(crate) fn open(&mut self, anchor: &PanelAnchor) -> bool {
        self.state = PanelState::Open;
        self.position = Some(anchor.position());

        let first_open = !self.tags_loaded;
        self.tags_loaded = true;
        first_open
    }

    pub(crate) fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    /// Close on clicks that are neither inside the panel nor on its button
    pub(crate) fn handle_click(&mut self, target: ClickTarget) {
        if self.is_open() && target == ClickTarget::Elsewhere {
            self.close();
        }
    }

    pub(crate) fn set_group(&mut self, kind: TagKind, group: ToggleGroup) {
        match kind {
            TagKind::Category => self.categories = group,
            TagKind::Attribute => self.attributes = group,
        }
    }

    /// Re-derive toggle visuals and the count badge from criteria
    pub(crate) fn sync(&mut self, criteria: &FilterCriteria) {
        for kind in [TagKind::Category, TagKind::Attribute] {
            let group = match kind {
                TagKind::Category => &mut self.categories,
                TagKind::Attribute => &mut self.attributes,
            };
            if let ToggleGroup::Loaded(toggles) = group {
                for toggle in toggles.iter_mut() {
                    toggle.active = criteria.contains(kind, &toggle.value);
                }
            }
        }
        self.active_count = criteria.active_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> PanelAnchor {
        PanelAnchor {
            button: Rect {
                left: 900.0,
                top: 40.0,
                width: 80.0,
                height: 30.0,
            },
            panel_width: 320.0,
            viewport_width: 1024.0,
        }
    }

    #[test]
    fn test_position_clamped_to_viewport() {
        let position = anchor().position();
        assert_eq!(position.top, 75.0);
        assert_eq!(position.left, 704.0);
    }

    #[test]
    fn test_first_open_only_once() {
        let mut panel = FilterPanel::default();
        assert!(panel.open(&anchor()));
        panel.close();
        assert!(!panel.open(&anchor()));
        assert!(panel.tags_loaded());
    }

    #[test]
    fn test_outside_click_closes() {
        let mut panel = FilterPanel::default();
        panel.open(&anchor());

        panel.handle_click(ClickTarget::InsidePanel);
        assert!(panel.is_open());

        panel.handle_click(ClickTarget::ToggleButton);
        assert!(panel.is_open());

        panel.handle_click(ClickTarget::Elsewhere);
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_sync_marks_active_toggles() {
        let mut panel = FilterPanel::default();
        panel.set_group(
            TagKind::Category,
            ToggleGroup::Loaded(vec![
                TagToggle {
                    value: "sci-fi".to_string(),
                    count: 3,
                    active: false,
                },
                TagToggle {
                    value: "anime".to_string(),
                    count: 9,
                    active: true,
                },
            ]),
        );

        let criteria = FilterCriteria::builder().category("sci-fi").build();
        panel.sync(&criteria);

        let toggles = panel.group(TagKind::Category).toggles();
        assert!(toggles[0].active);
        assert!(!toggles[1].active);
        assert_eq!(panel.active_count(), 1);
    }
}

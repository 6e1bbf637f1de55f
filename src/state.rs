//! Page-wide state shared between managers
//!
//! Instead of a global object, wiring code creates one [`SharedPageState`] and
//! hands clones of it to every manager that needs it. Each filter manager
//! only writes the entry for its own context.

use crate::filters::{FilterCriteria, ListingContext};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// What the page currently shows for one listing context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    /// Criteria last pushed to the reload collaborator
    pub filters: FilterCriteria,
    /// Whether the filter button is drawn as active
    pub filter_button_active: bool,
}

/// Snapshot of every context
#[derive(Debug, Default)]
pub struct PageState {
    contexts: HashMap<ListingContext, ContextSnapshot>,
}

/// Cloneable handle to the page state
#[derive(Debug, Clone, Default)]
pub struct SharedPageState {
    inner: Arc<RwLock<PageState>>,
}

impl SharedPageState {
    /// Create an empty page state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of one context's snapshot (default if never written)
    #[must_use]
    pub fn snapshot(&self, context: ListingContext) -> ContextSnapshot {
        let state = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        state.contexts.get(&context).cloned().unwrap_or_default()
    }

    /// Record the criteria a context is now filtering by
    pub fn set_filters(&self, context: ListingContext, filters: FilterCriteria) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.contexts.entry(context).or_default().filters = filters;
    }

    /// Record whether a context's filter button is active
    pub fn set_filter_button_active(&self, context: ListingContext, active: bool) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.contexts.entry(context).or_default().filter_button_active = active;
    }
}

//! Filter manager for one listing context
//!
//! `FilterManager` owns the `FilterCriteria` of a single context and keeps it in
//! sync with the filter panel, durable storage, the shared page state and the
//! context's reload collaborator. Every collaborator is injected through
//! [`FilterDeps`]; nothing is looked up at call time.
//!
//! # Examples
//!
//! ```no_run
//! use lora_browse::filters::{FilterContext, FilterDeps, FilterManager, ListingContext, TagKind};
//! # async fn demo(context: FilterContext, deps: FilterDeps) {
//! let mut manager = FilterManager::new(context, deps);
//! manager.toggle_tag("sci-fi", TagKind::Category).await;
//! manager.clear_filters().await;
//! # }
//! ```

use super::context::{ContextDescriptor, FilterContext, ListingContext};
use super::panel::{ClickTarget, FilterPanel, PanelAnchor, TagToggle, ToggleGroup};
use super::reload::{ApplyOutcome, ReloadJob, ReloadRequest, ReloadSequencer, RenderObserver};
use super::source::TagSource;
use super::types::{FilterCriteria, TagKind};
use crate::navigate::{PageNavigator, build_page_url};
use crate::notify::Notifier;
use crate::state::SharedPageState;
use crate::storage::DurableStorage;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default number of candidate tags requested for the panel
pub const DEFAULT_TAG_LIMIT: usize = 20;

/// Collaborators a filter manager needs
#[derive(Clone)]
pub struct FilterDeps {
    pub tag_source: Arc<dyn TagSource>,
    pub storage: Arc<dyn DurableStorage>,
    pub notifier: Arc<dyn Notifier>,
    pub state: SharedPageState,
    /// Full-page fallback for failed reloads (disabled when `None`)
    pub navigator: Option<Arc<dyn PageNavigator>>,
    /// Base URL the fallback page is built from
    pub server_url: String,
    pub tag_limit: usize,
    /// Told about every successful reload (selection re-apply hooks here)
    pub observers: Vec<Arc<dyn RenderObserver>>,
}

impl FilterDeps {
    /// Create dependencies without navigation fallback or observers
    #[must_use]
    pub fn new(
        tag_source: Arc<dyn TagSource>,
        storage: Arc<dyn DurableStorage>,
        notifier: Arc<dyn Notifier>,
        state: SharedPageState,
    ) -> Self {
        Self {
            tag_source,
            storage,
            notifier,
            state,
            navigator: None,
            server_url: String::new(),
            tag_limit: DEFAULT_TAG_LIMIT,
            observers: Vec::new(),
        }
    }

    /// Enable full-page navigation when a reload fails
    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn PageNavigator>, server_url: &str) -> Self {
        self.navigator = Some(navigator);
        self.server_url = server_url.to_string();
        self
    }

    /// Set how many candidate tags to request
    #[must_use]
    pub const fn with_tag_limit(mut self, limit: usize) -> Self {
        self.tag_limit = limit;
        self
    }

    /// Add an observer notified after each successful reload
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RenderObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

/// Filter state for one listing context
pub struct FilterManager {
    context: FilterContext,
    deps: FilterDeps,
    criteria: FilterCriteria,
    panel: FilterPanel,
    sequencer: ReloadSequencer,
}

impl FilterManager {
    /// Create a manager and restore its criteria from durable storage
    #[must_use]
    pub fn new(context: FilterContext, deps: FilterDeps) -> Self {
        let mut manager = Self {
            context,
            deps,
            criteria: FilterCriteria::new(),
            panel: FilterPanel::default(),
            sequencer: ReloadSequencer::new(),
        };
        manager.load_filters_from_storage();
        manager
    }

    /// Current criteria
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Panel view model
    #[must_use]
    pub const fn panel(&self) -> &FilterPanel {
        &self.panel
    }

    #[must_use]
    pub const fn descriptor(&self) -> &ContextDescriptor {
        &self.context.descriptor
    }

    #[must_use]
    pub const fn listing_context(&self) -> ListingContext {
        self.context.descriptor.context
    }

    /// Restore criteria from durable storage
    ///
    /// Missing, unreadable or malformed data yields empty criteria. Toggle
    /// visuals, the count badge and the page state follow the result.
    pub fn load_filters_from_storage(&mut self) {
        let key = self.context.descriptor.filters_key();

        self.criteria = match self.deps.storage.get(&key) {
            Ok(Some(raw)) => FilterCriteria::from_json(&raw).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "ignoring malformed stored filters");
                FilterCriteria::new()
            }),
            Ok(None) => FilterCriteria::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "failed to read stored filters");
                FilterCriteria::new()
            }
        };

        debug!(
            context = %self.listing_context(),
            active = self.criteria.active_count(),
            "loaded filters from storage"
        );

        self.panel.sync(&self.criteria);
        let context = self.listing_context();
        self.deps.state.set_filters(context, self.criteria.clone());
        self.deps
            .state
            .set_filter_button_active(context, self.criteria.has_active());
    }

    /// Fetch candidate tags and base models into the panel
    ///
    /// Each toggle group fails independently into an inline error message.
    pub async fn load_available_tags(&mut self) {
        let descriptor = &self.context.descriptor;

        let categories = match self
            .deps
            .tag_source
            .top_tags(&descriptor.tag_endpoint, self.deps.tag_limit)
            .await
        {
            Ok(tags) => ToggleGroup::Loaded(
                tags.into_iter()
                    .map(|t| TagToggle {
                        value: t.tag,
                        count: t.count,
                        active: false,
                    })
                    .collect(),
            ),
            Err(e) => {
                warn!(context = %descriptor.context, error = %e, "failed to load tags");
                ToggleGroup::Failed("Failed to load tags".to_string())
            }
        };

        let attributes = match self
            .deps
            .tag_source
            .base_models(&descriptor.base_model_endpoint)
            .await
        {
            Ok(models) => ToggleGroup::Loaded(
                models
                    .into_iter()
                    .map(|m| TagToggle {
                        value: m.name,
                        count: m.count,
                        active: false,
                    })
                    .collect(),
            ),
            Err(e) => {
                warn!(context = %descriptor.context, error = %e, "failed to load base models");
                ToggleGroup::Failed("Failed to load base models".to_string())
            }
        };

        self.panel.set_group(TagKind::Category, categories);
        self.panel.set_group(TagKind::Attribute, attributes);
        self.panel.sync(&self.criteria);
    }

    /// Flip `tag` in the criteria and reload silently
    pub async fn toggle_tag(&mut self, tag: &str, kind: TagKind) -> ApplyOutcome {
        self.toggle_and_apply(tag, kind, false).await
    }

    /// Flip `tag` in the criteria and reload
    ///
    /// With `notify` set the result is announced like [`Self::apply_filters`].
    pub async fn toggle_and_apply(
        &mut self,
        tag: &str,
        kind: TagKind,
        notify: bool,
    ) -> ApplyOutcome {
        let active = self.criteria.toggle(kind, tag);
        debug!(context = %self.listing_context(), tag, %kind, active, "toggled filter tag");

        self.panel.sync(&self.criteria);
        self.apply_filters(notify).await
    }

    /// Persist the criteria and reload the listing
    ///
    /// When `notify` is set a summary (or "Filters cleared") is shown after a
    /// successful reload.
    pub async fn apply_filters(&mut self, notify: bool) -> ApplyOutcome {
        self.begin_apply(notify).run().await
    }

    /// Persist the criteria, update the page state and return the reload job
    ///
    /// Awaiting `ReloadJob::run` finishes the apply. Jobs may be spawned and
    /// overlap; only the most recently begun one affects the page.
    #[must_use]
    pub fn begin_apply(&mut self, notify: bool) -> ReloadJob {
        let key = self.context.descriptor.filters_key();
        match self.criteria.to_json() {
            Ok(json) => {
                if let Err(e) = self.deps.storage.set(&key, &json) {
                    warn!(key = %key, error = %e, "failed to persist filters");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "failed to serialize filters"),
        }

        self.deps
            .state
            .set_filters(self.listing_context(), self.criteria.clone());
        self.reload_job(notify)
    }

    /// Drop every filter, forget the stored criteria and reload
    pub async fn clear_filters(&mut self) -> ApplyOutcome {
        self.criteria.clear();

        let key = self.context.descriptor.filters_key();
        if let Err(e) = self.deps.storage.remove(&key) {
            warn!(key = %key, error = %e, "failed to remove stored filters");
        }

        self.panel.sync(&self.criteria);
        self.deps
            .state
            .set_filters(self.listing_context(), FilterCriteria::new());
        info!(context = %self.listing_context(), "filters cleared");

        self.reload_job(true).run().await
    }

    /// Open the panel; the first open loads the candidate tags
    pub async fn open_panel(&mut self, anchor: &PanelAnchor) {
        if self.panel.open(anchor) {
            self.load_available_tags().await;
        }
    }

    pub fn close_panel(&mut self) {
        self.panel.close();
    }

    /// Open a closed panel or close an open one
    pub async fn toggle_panel(&mut self, anchor: &PanelAnchor) {
        if self.panel.is_open() {
            self.close_panel();
        } else {
            self.open_panel(anchor).await;
        }
    }

    /// Route a page click to the panel
    pub fn handle_click(&mut self, target: ClickTarget) {
        self.panel.handle_click(target);
    }

    fn reload_job(&self, notify: bool) -> ReloadJob {
        let descriptor = &self.context.descriptor;

        let fallback_url = self.deps.navigator.as_ref().and_then(|_| {
            build_page_url(&self.deps.server_url, &descriptor.page_path, &self.criteria)
                .inspect_err(|e| warn!(error = %e, "cannot build fallback page URL"))
                .ok()
        });

        ReloadJob {
            request: ReloadRequest {
                context: descriptor.context,
                criteria: self.criteria.clone(),
                reset_page: descriptor.reset_page,
                force_refetch: descriptor.force_refetch,
                ticket: self.sequencer.issue(),
            },
            reloader: Arc::clone(&self.context.reloader),
            notifier: Arc::clone(&self.deps.notifier),
            navigator: self.deps.navigator.clone(),
            fallback_url,
            observers: self.deps.observers.clone(),
            state: self.deps.state.clone(),
            notify,
        }
    }
}

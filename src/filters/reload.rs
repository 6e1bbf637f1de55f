//! Listing reloads and their sequencing
//!
//! A filter change ends in a call to the context's [`ListingReloader`]. Reloads
//! are asynchronous and the UI may start a new one before the previous one
//! resolves, so every request carries a [`ReloadTicket`]. Only the newest
//! ticket of a [`ReloadSequencer`] is current; a reload that resolves with a
//! stale ticket is dropped without touching the page.
//!
//! # Workflow
//!
//! ```text
//! FilterManager::begin_apply()
//!     ↓  persist + snapshot + issue ticket
//! ReloadJob::run()
//!     ↓
//! ListingReloader::reload(request)
//!     ├─ Ok, ticket current  → render observers, button state, notification
//!     ├─ Ok, ticket stale    → Superseded (nothing touched)
//!     └─ Err                 → page navigation fallback or error notification
//! ```

use super::context::ListingContext;
use super::error::ReloadError;
use super::types::FilterCriteria;
use crate::navigate::PageNavigator;
use crate::notify::{Notifier, Severity};
use crate::state::SharedPageState;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Issues monotonically increasing reload tickets
#[derive(Debug, Clone, Default)]
pub struct ReloadSequencer {
    latest: Arc<AtomicU64>,
}

impl ReloadSequencer {
    /// Create a sequencer with no outstanding tickets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, making every earlier one stale
    #[must_use]
    pub fn issue(&self) -> ReloadTicket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        ReloadTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }
}

/// Proof of which reload request is the newest
#[derive(Debug, Clone)]
pub struct ReloadTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl ReloadTicket {
    /// Sequence number of this ticket
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether no newer ticket has been issued since this one
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// What a reload collaborator is asked to show
#[derive(Debug, Clone)]
pub struct ReloadRequest {
    pub context: ListingContext,
    pub criteria: FilterCriteria,
    pub reset_page: bool,
    pub force_refetch: bool,
    /// Collaborators should skip committing their render when this is stale
    pub ticket: ReloadTicket,
}

/// Result reported by a reload collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadOutcome {
    /// Total number of items matching the criteria
    pub total_items: u64,
}

/// Refetches and re-renders one listing
#[async_trait]
pub trait ListingReloader: Send + Sync {
    /// Reload the listing for `request`
    ///
    /// # Errors
    ///
    /// Returns `ReloadError` if the listing cannot be fetched.
    async fn reload(&self, request: &ReloadRequest) -> Result<ReloadOutcome, ReloadError>;
}

/// Notified after a listing has been re-rendered
pub trait RenderObserver: Send + Sync {
    fn on_listing_rendered(&self);
}

/// How an apply/clear ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The listing was reloaded with the criteria
    Applied { total_items: u64 },
    /// A newer reload was requested before this one resolved
    Superseded,
    /// The partial reload failed and the full page was opened instead
    NavigatedAway { url: String },
    /// The reload failed and no fallback was possible
    Failed(String),
}

/// A sequenced reload, ready to be awaited or spawned
pub struct ReloadJob {
    pub(crate) request: ReloadRequest,
    pub(crate) reloader: Arc<dyn ListingReloader>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) navigator: Option<Arc<dyn PageNavigator>>,
    pub(crate) fallback_url: Option<String>,
    pub(crate) observers: Vec<Arc<dyn RenderObserver>>,
    pub(crate) state: SharedPageState,
    pub(crate) notify: bool,
}

impl ReloadJob {
    /// Run the reload and apply its result to the page
    pub async fn run(self) -> ApplyOutcome {
        let context = self.request.context;
        let generation = self.request.ticket.generation();
        debug!(%context, generation, "reloading listing");

        let result = self.reloader.reload(&self.request).await;

        if !self.request.ticket.is_current() {
            debug!(%context, generation, "discarding superseded reload");
            return ApplyOutcome::Superseded;
        }

        match result {
            Ok(outcome) => {
                for observer in &self.observers {
                    observer.on_listing_rendered();
                }

                let active = self.request.criteria.has_active();
                self.state.set_filter_button_active(context, active);

                if self.notify {
                    match self.request.criteria.summary() {
                        Some(summary) => self.notifier.notify(&summary, Severity::Success),
                        None => self.notifier.notify("Filters cleared", Severity::Info),
                    }
                }

                info!(%context, total = outcome.total_items, "filters applied");
                ApplyOutcome::Applied {
                    total_items: outcome.total_items,
                }
            }
            Err(e) => {
                warn!(%context, error = %e, "listing reload failed");
                self.fall_back(&e.to_string())
            }
        }
    }

    fn fall_back(&self, reason: &str) -> ApplyOutcome {
        if let (Some(navigator), Some(url)) = (&self.navigator, &self.fallback_url) {
            match navigator.navigate(url) {
                Ok(()) => {
                    info!(url = %url, "fell back to full page navigation");
                    return ApplyOutcome::NavigatedAway { url: url.clone() };
                }
                Err(e) => warn!(error = %e, "navigation fallback failed"),
            }
        }

        let message = format!("Failed to apply filters: {reason}");
        self.notifier.notify(&message, Severity::Error);
        ApplyOutcome::Failed(reason.to_string())
    }
}

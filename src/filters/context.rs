//! Listing contexts and their descriptors
//!
//! The browser has one filter panel per listing view. Each view differs only in
//! which endpoints it reads, where it persists its criteria and which reload it
//! triggers, so a single `FilterManager` is parameterised by a
//! [`ContextDescriptor`] instead of being duplicated per view.

use super::reload::ListingReloader;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A listing view that owns its own filter criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingContext {
    Loras,
    Recipes,
    Checkpoints,
}

impl ListingContext {
    /// All contexts, in display order
    pub const ALL: [Self; 3] = [Self::Loras, Self::Recipes, Self::Checkpoints];

    /// Short identifier used in keys and URLs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loras => "loras",
            Self::Recipes => "recipes",
            Self::Checkpoints => "checkpoints",
        }
    }

    /// Built-in descriptor for this context
    #[must_use]
    pub fn descriptor(self) -> ContextDescriptor {
        ContextDescriptor::for_context(self)
    }
}

impl fmt::Display for ListingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loras" | "lora" => Ok(Self::Loras),
            "recipes" | "recipe" => Ok(Self::Recipes),
            "checkpoints" | "checkpoint" => Ok(Self::Checkpoints),
            other => Err(format!("unknown listing context '{other}'")),
        }
    }
}

/// Everything that distinguishes one context's filter manager from another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDescriptor {
    pub context: ListingContext,
    /// Endpoint returning `{success, tags: [{tag, count}]}`
    pub tag_endpoint: String,
    /// Endpoint returning `{success, base_models: [{name, count}]}`
    pub base_model_endpoint: String,
    /// Paginated listing endpoint
    pub list_endpoint: String,
    /// Full-page route used for navigation fallback
    pub page_path: String,
    /// Prefix of every durable-storage key this context writes
    pub storage_key_prefix: String,
    /// Passed to the reload collaborator on filter changes
    pub reset_page: bool,
    /// Passed to the reload collaborator on filter changes
    pub force_refetch: bool,
}

impl ContextDescriptor {
    /// Built-in descriptor for a context, matching the server's routes
    #[must_use]
    pub fn for_context(context: ListingContext) -> Self {
        let name = context.as_str();
        let page_path = match context {
            ListingContext::Loras => "/loras".to_string(),
            ListingContext::Recipes => "/loras/recipes".to_string(),
            ListingContext::Checkpoints => "/checkpoints".to_string(),
        };

        Self {
            context,
            tag_endpoint: format!("/api/{name}/top-tags"),
            base_model_endpoint: format!("/api/{name}/base-models"),
            list_endpoint: format!("/api/{name}"),
            page_path,
            storage_key_prefix: format!("lora_manager_{name}_"),
            reset_page: true,
            force_refetch: matches!(context, ListingContext::Loras),
        }
    }

    /// Durable-storage key holding this context's criteria
    #[must_use]
    pub fn filters_key(&self) -> String {
        format!("{}filters", self.storage_key_prefix)
    }
}

/// A descriptor bound to the reload collaborator for its context
#[derive(Clone)]
pub struct FilterContext {
    pub descriptor: ContextDescriptor,
    pub reloader: Arc<dyn ListingReloader>,
}

impl FilterContext {
    /// Bind a descriptor to its reloader
    #[must_use]
    pub fn new(descriptor: ContextDescriptor, reloader: Arc<dyn ListingReloader>) -> Self {
        Self {
            descriptor,
            reloader,
        }
    }
}

impl fmt::Debug for FilterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

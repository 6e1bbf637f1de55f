//! HTTP client for the LoRA manager server
//!
//! [`HttpCatalog`] talks to the server's JSON API and serves as both the
//! [`TagSource`] and the [`ListingReloader`] of the terminal front end.
//!
//! Endpoints used (per context, see `ContextDescriptor`):
//! - `GET /api/<ctx>?page=&page_size=&sort_by=&tags=&base_models=`
//! - `GET /api/<ctx>/top-tags?limit=`
//! - `GET /api/<ctx>/base-models`

pub mod error;

pub use error::CatalogError;

use crate::filters::{
    BaseModelCount, BaseModelListResponse, FilterCriteria, FilterError, ListingContext,
    ListingReloader, ReloadError, ReloadOutcome, ReloadRequest, ReloadTicket, TagCount,
    TagListResponse, TagSource,
};
use crate::navigate::append_filter_query;
use crate::selection::{ItemSnapshot, MediaKind, RenderedItem};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// One item of a listing page, as sent by the server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingItem {
    pub file_path: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default)]
    pub base_model: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Either a JSON-encoded string or an object
    #[serde(default)]
    pub usage_tips: Option<serde_json::Value>,
}

impl ListingItem {
    /// Usage tips normalised to a string
    #[must_use]
    pub fn usage_hint(&self) -> Option<String> {
        match &self.usage_tips {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

impl From<&ListingItem> for RenderedItem {
    fn from(item: &ListingItem) -> Self {
        Self::new(
            item.file_path.clone(),
            ItemSnapshot {
                display_name: item.file_name.clone(),
                preview_url: item.preview_url.clone(),
                media_kind: MediaKind::from_preview_url(&item.preview_url),
                usage_hint: item.usage_hint(),
            },
        )
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub items: Vec<ListingItem>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

const fn first_page() -> u32 {
    1
}

impl ListingPage {
    /// Items as the grid would render them
    #[must_use]
    pub fn rendered_items(&self) -> Vec<RenderedItem> {
        self.items.iter().map(RenderedItem::from).collect()
    }
}

/// Client for one server
///
/// One client serves every listing view, so the last rendered page is kept
/// per [`ListingContext`].
pub struct HttpCatalog {
    client: Client,
    base_url: Url,
    page_size: u32,
    last_pages: Mutex<HashMap<ListingContext, ListingPage>>,
}

impl HttpCatalog {
    /// Create a client for the server at `server_url`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidUrl` if `server_url` is not a URL.
    pub fn new(server_url: &str, page_size: u32) -> Result<Self, CatalogError> {
        let base_url =
            Url::parse(server_url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            page_size,
            last_pages: Mutex::new(HashMap::new()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Fetch one page of a listing with filters applied
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the payload is invalid.
    pub async fn fetch_page(
        &self,
        list_endpoint: &str,
        criteria: &FilterCriteria,
        page: u32,
    ) -> Result<ListingPage, CatalogError> {
        let mut url = self.endpoint(list_endpoint)?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &self.page_size.to_string())
            .append_pair("sort_by", "name");
        append_filter_query(&mut url, criteria);

        self.get_json(url).await
    }

    /// Page stored by the most recent current reload of `context`
    #[must_use]
    pub fn last_page(&self, context: ListingContext) -> Option<ListingPage> {
        self.last_pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&context)
            .cloned()
    }

    /// Page a reload of `request` should fetch
    fn reload_page(&self, request: &ReloadRequest) -> u32 {
        if request.reset_page {
            return 1;
        }
        self.last_page(request.context).map_or(1, |p| p.page)
    }

    /// Keep `listing` as the page of `context` unless `ticket` is stale
    fn remember_page(&self, context: ListingContext, ticket: &ReloadTicket, listing: ListingPage) {
        if !ticket.is_current() {
            debug!(%context, "stale listing not kept");
            return;
        }
        self.last_pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(context, listing);
    }
}

#[async_trait]
impl TagSource for HttpCatalog {
    async fn top_tags(&self, endpoint: &str, limit: usize) -> Result<Vec<TagCount>, FilterError> {
        let fetch = |e: CatalogError| FilterError::Fetch {
            what: "top tags".to_string(),
            reason: e.to_string(),
        };

        let mut url = self.endpoint(endpoint).map_err(fetch)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let response: TagListResponse = self.get_json(url).await.map_err(fetch)?;
        if !response.success {
            return Err(FilterError::Rejected {
                what: "top tags".to_string(),
                reason: response.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(response.tags)
    }

    async fn base_models(&self, endpoint: &str) -> Result<Vec<BaseModelCount>, FilterError> {
        let fetch = |e: CatalogError| FilterError::Fetch {
            what: "base models".to_string(),
            reason: e.to_string(),
        };

        let url = self.endpoint(endpoint).map_err(fetch)?;
        let response: BaseModelListResponse = self.get_json(url).await.map_err(fetch)?;
        if !response.success {
            return Err(FilterError::Rejected {
                what: "base models".to_string(),
                reason: response.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(response.base_models)
    }
}

#[async_trait]
impl ListingReloader for HttpCatalog {
    async fn reload(&self, request: &ReloadRequest) -> Result<ReloadOutcome, ReloadError> {
        let descriptor = request.context.descriptor();
        let page = self.reload_page(request);

        let listing = self
            .fetch_page(&descriptor.list_endpoint, &request.criteria, page)
            .await
            .map_err(|e| match e {
                CatalogError::Request(err) if err.is_decode() => {
                    ReloadError::InvalidResponse(err.to_string())
                }
                other => ReloadError::Request(other.to_string()),
            })?;

        let total_items = listing.total;
        self.remember_page(request.context, &request.ticket, listing);

        Ok(ReloadOutcome { total_items })
    }
}

//! Full-page navigation fallback
//!
//! When a partial reload fails, the browser can still show the filtered view by
//! loading the listing page with the filters in its query string.

use crate::filters::{FilterCriteria, NavigateError};
use reqwest::Url;

/// Something that can show a full page for a URL
pub trait PageNavigator: Send + Sync {
    /// Navigate to `url`
    ///
    /// # Errors
    ///
    /// Returns `NavigateError` if the page cannot be opened.
    fn navigate(&self, url: &str) -> Result<(), NavigateError>;
}

/// Opens pages in the user's default browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl PageNavigator for BrowserNavigator {
    fn navigate(&self, url: &str) -> Result<(), NavigateError> {
        open::that(url).map_err(|e| NavigateError::OpenFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Append the criteria as `tags` / `base_models` query parameters
pub(crate) fn append_filter_query(url: &mut Url, criteria: &FilterCriteria) {
    if !criteria.has_active() {
        return;
    }

    let mut pairs = url.query_pairs_mut();
    if !criteria.category().is_empty() {
        pairs.append_pair("tags", &criteria.category().join(","));
    }
    if !criteria.attribute().is_empty() {
        pairs.append_pair("base_models", &criteria.attribute().join(","));
    }
}

/// Build the full-page URL for a listing with filters applied
///
/// # Errors
///
/// Returns `NavigateError::InvalidUrl` if `server_url` or `page_path` do not
/// form a valid URL.
pub fn build_page_url(
    server_url: &str,
    page_path: &str,
    criteria: &FilterCriteria,
) -> Result<String, NavigateError> {
    let base = Url::parse(server_url).map_err(|e| NavigateError::InvalidUrl(e.to_string()))?;
    let mut url = base
        .join(page_path)
        .map_err(|e| NavigateError::InvalidUrl(e.to_string()))?;

    append_filter_query(&mut url, criteria);
    Ok(url.to_string())
}

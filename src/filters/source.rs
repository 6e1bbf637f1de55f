//! Source of candidate tags for the filter panel

use super::error::FilterError;
use super::types::{BaseModelCount, TagCount};
use async_trait::async_trait;

/// Fetches the tags and base models a context can be filtered by
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Most used category tags, at most `limit` of them
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the request fails or the server reports failure.
    async fn top_tags(&self, endpoint: &str, limit: usize) -> Result<Vec<TagCount>, FilterError>;

    /// Base models in use, most used first
    ///
    /// # Errors
    ///
    /// Returns `FilterError` if the request fails or the server reports failure.
    async fn base_models(&self, endpoint: &str) -> Result<Vec<BaseModelCount>, FilterError>;
}

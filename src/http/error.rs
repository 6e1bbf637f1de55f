//! HTTP client error types

use thiserror::Error;

/// Errors talking to the server
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport, status or decoding failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A URL could not be built from the configured server address
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

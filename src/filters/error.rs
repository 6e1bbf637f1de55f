//! Error types for filter operations
//!
//! None of these reach the caller of a filter manager operation: the manager
//! turns them into inline error state or notifications. They exist so the
//! collaborators (tag sources, reloaders, navigators) can report what went wrong.

use thiserror::Error;

/// Errors that can occur while fetching filter data
#[derive(Debug, Error)]
pub enum FilterError {
    /// The tag or base-model listing could not be fetched
    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: String, reason: String },

    /// The server answered but reported failure
    #[error("Server rejected {what} request: {reason}")]
    Rejected { what: String, reason: String },
}

/// Failure of a listing reload
#[derive(Debug, Error)]
pub enum ReloadError {
    /// The listing request failed
    #[error("Listing request failed: {0}")]
    Request(String),

    /// The listing response could not be understood
    #[error("Invalid listing response: {0}")]
    InvalidResponse(String),
}

/// Failure to navigate to a full page
#[derive(Debug, Error)]
pub enum NavigateError {
    /// The target URL could not be built
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    /// The URL could not be opened
    #[error("Failed to open '{url}': {reason}")]
    OpenFailed { url: String, reason: String },
}

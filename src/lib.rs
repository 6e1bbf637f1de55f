//! lora-browse - filtering and bulk selection for a LoRA manager server
//!
//! This library keeps the filter criteria of each listing view in sync with
//! durable storage and the server listing, and lets users select items across
//! pages and copy them as prompt syntax.
//!
//! Collaborators (server, storage, clipboard, notifications, navigation) are
//! injected through traits so the managers run against fakes in tests and
//! against the real implementations in the `lora-browse` binary.

use thiserror::Error;

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod filters;
pub mod http;
pub mod logging;
pub mod navigate;
pub mod notify;
pub mod selection;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum LoraBrowseError {
    /// Durable storage error
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
    /// Filter error
    #[error("Filter error: {0}")]
    Filter(#[from] filters::FilterError),
    /// Server communication error
    #[error("Server error: {0}")]
    Catalog(#[from] http::CatalogError),
    /// Page navigation error
    #[error("Navigation error: {0}")]
    Navigate(#[from] filters::NavigateError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

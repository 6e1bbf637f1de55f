//! Storage-specific error types
//!
//! This module defines the errors that can occur while reading or writing the
//! durable key/value store.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`InvalidUtf8`**: A stored value could not be read back as text
//! - **`PathError`**: The storage location could not be determined
//!
//! All errors implement `std::error::Error` via the `thiserror` crate.

use thiserror::Error;

/// Durable storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Represents a sled database error
    #[error("Storage error: {0}")]
    SledError(#[from] sled::Error),

    /// Stored bytes under a key are not valid UTF-8
    #[error("Value stored under '{0}' is not valid UTF-8")]
    InvalidUtf8(String),

    /// Storage directory could not be resolved
    #[error("Error while resolving storage path: {0}")]
    PathError(String),
}

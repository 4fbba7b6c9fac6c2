//! Error types for store operations.

use pagesync_model::PageId;
use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Persisted store state could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// An update or delete referenced a page the store does not hold.
    #[error("no page with id {0}")]
    NotFound(PageId),

    /// A backend-specific failure.
    #[error("backend error: {message}")]
    Backend {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },
}

impl StoreError {
    /// Creates a retryable backend error.
    pub fn backend_retryable(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable backend error.
    pub fn backend_fatal(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    ///
    /// The reconciliation engine never retries; this is for store
    /// implementations that wrap a flaky transport.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Backend { retryable, .. } => *retryable,
            StoreError::Io(_) => true,
            _ => false,
        }
    }
}

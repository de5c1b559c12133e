//! Object store errors.

use thiserror::Error;

/// Errors from object-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the backing store.
    #[error("failed to open object store: {0}")]
    Open(String),

    /// Backend storage error.
    #[error("object storage error: {0}")]
    Storage(String),

    /// Failed to decode stored object metadata.
    #[error("object serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

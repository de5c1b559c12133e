//! Cache operation errors.

use thiserror::Error;

/// Errors from response-cache operations.
///
/// A failed cache write must never surface as a request error; callers log
/// and swallow these.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to open the backing store.
    #[error("failed to open cache store: {0}")]
    Open(String),

    /// Backend storage error.
    #[error("cache storage error: {0}")]
    Storage(String),

    /// Failed to serialize or deserialize a cache entry.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

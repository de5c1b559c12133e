//! Cache key composition.

use serde::{Deserialize, Serialize};

use asset_core::AssetRequest;

/// A cache key uniquely identifying a stored response.
///
/// Keyed by method plus the full request URL (scheme, host, path, query), so
/// two tenants' identical paths never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    /// Create a cache key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Build the key for an inbound request.
    pub fn for_request(request: &AssetRequest) -> Self {
        Self {
            key: format!("{} {}", request.method.as_str(), request.url()),
        }
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

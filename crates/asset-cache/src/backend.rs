//! Response cache backends.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::entry::CachedResponse;
use crate::error::CacheError;
use crate::key::CacheKey;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Shared, externally-managed response cache.
///
/// The gateway only ever performs independent read-then-maybe-write
/// operations per key; there is no compare-and-swap and no invalidation.
/// Races between concurrent requests for the same path at most cause
/// redundant writes, never corruption.
#[async_trait(?Send)]
pub trait ResponseCache {
    /// Look up a stored response.
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedResponse>>;

    /// Store a response. Last writer wins.
    async fn put(&self, key: &CacheKey, entry: &CachedResponse) -> CacheResult<()>;
}

/// In-memory response cache for tests and local development.
#[derive(Default)]
pub struct InMemoryResponseCache {
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl InMemoryResponseCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait(?Send)]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedResponse>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        Ok(entries.get(key.as_str()).cloned())
    }

    async fn put(&self, key: &CacheKey, entry: &CachedResponse) -> CacheResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Storage(e.to_string()))?;
        entries.insert(key.as_str().to_string(), entry.clone());
        Ok(())
    }
}

/// Response cache backed by Spin's Key-Value Store.
///
/// Entries are stored as JSON. The store is best-effort and eventually
/// consistent; a failed put is the caller's to swallow.
pub struct KvResponseCache {
    #[cfg(target_arch = "wasm32")]
    store: spin_sdk::key_value::Store,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

impl KvResponseCache {
    /// Open the default Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> CacheResult<Self> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    /// Open a named Key-Value store.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> CacheResult<Self> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    // Non-WASM stubs for development/testing
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> CacheResult<Self> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> CacheResult<Self> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }
}

#[async_trait(?Send)]
impl ResponseCache for KvResponseCache {
    #[cfg(target_arch = "wasm32")]
    async fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedResponse>> {
        match self.store.get(key.as_str()) {
            Ok(Some(bytes)) => {
                let entry: CachedResponse = serde_json::from_slice(&bytes)?;
                Ok(Some(entry))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::Storage(e.to_string())),
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn put(&self, key: &CacheKey, entry: &CachedResponse) -> CacheResult<()> {
        let bytes = serde_json::to_vec(entry)?;
        self.store
            .set(key.as_str(), &bytes)
            .map_err(|e| CacheError::Storage(e.to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn get(&self, _key: &CacheKey) -> CacheResult<Option<CachedResponse>> {
        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn put(&self, _key: &CacheKey, _entry: &CachedResponse) -> CacheResult<()> {
        Ok(())
    }
}

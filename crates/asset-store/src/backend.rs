//! Object store backends.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::object::StoredObject;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Bucket-style storage keyed by string paths.
#[async_trait(?Send)]
pub trait ObjectStore {
    /// Look up an object by key. `Ok(None)` means the key does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>>;
}

/// In-memory object store for tests and local development.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object under a key.
    pub fn with_object(self, key: impl Into<String>, object: StoredObject) -> Self {
        self.objects
            .lock()
            .expect("store lock poisoned")
            .insert(key.into(), object);
        self
    }

    /// Insert an object under a key.
    pub fn insert(&self, key: impl Into<String>, object: StoredObject) {
        self.objects
            .lock()
            .expect("store lock poisoned")
            .insert(key.into(), object);
    }
}

#[async_trait(?Send)]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let objects = self
            .objects
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(objects.get(key).cloned())
    }
}

/// Object store backed by Spin's Key-Value Store.
///
/// Objects are stored as JSON (body bytes plus metadata) under their
/// path-like key, in a store separate from the response cache.
pub struct KvObjectStore {
    #[cfg(target_arch = "wasm32")]
    store: spin_sdk::key_value::Store,
    #[cfg(not(target_arch = "wasm32"))]
    _phantom: std::marker::PhantomData<()>,
}

impl KvObjectStore {
    /// Open a named Key-Value store holding tenant objects.
    #[cfg(target_arch = "wasm32")]
    pub fn open(name: &str) -> StoreResult<Self> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    // Non-WASM stub for development/testing
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(_name: &str) -> StoreResult<Self> {
        Ok(Self {
            _phantom: std::marker::PhantomData,
        })
    }
}

#[async_trait(?Send)]
impl ObjectStore for KvObjectStore {
    #[cfg(target_arch = "wasm32")]
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        match self.store.get(key) {
            Ok(Some(bytes)) => {
                let object: StoredObject = serde_json::from_slice(&bytes)?;
                Ok(Some(object))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn get(&self, _key: &str) -> StoreResult<Option<StoredObject>> {
        Ok(None)
    }
}

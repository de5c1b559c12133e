//! Shared response-cache abstraction for the edge asset gateway.
//!
//! This crate provides:
//! - `CacheKey` - Full-request-URL cache key
//! - `CachedResponse` - Stored HTTP response (status, headers, body)
//! - `CacheStatus` - HIT/MISS marker for the diagnostic response header
//! - `ResponseCache` - Backend trait with in-memory and Spin KV backends
//!
//! The backing store is shared and best-effort: writes are asynchronous,
//! last-writer-wins, and never guaranteed to be visible to the request that
//! created them.

mod backend;
mod entry;
mod error;
mod key;

pub use backend::*;
pub use entry::*;
pub use error::*;
pub use key::*;

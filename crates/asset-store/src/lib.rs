//! Durable object-store abstraction for the edge asset gateway.
//!
//! This crate provides:
//! - `StoredObject` - Body bytes plus optional stored content type
//! - `ObjectStore` - Backend trait with in-memory and Spin KV backends
//!
//! The store is the system of record for tenant assets, keyed by string
//! paths. Absence is a well-defined "not found" result, not an error.

mod backend;
mod error;
mod object;

pub use backend::*;
pub use error::*;
pub use object::*;

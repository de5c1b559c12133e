//! Core abstractions for the multi-tenant edge asset gateway.
//!
//! This crate provides the fundamental types:
//! - `GatewayConfig` / `TenantMap` - Injected, read-only gateway configuration
//! - `AssetRequest` - Per-request descriptor with decoded path and tenant host
//! - `content_type_for` - Extension-based content-type inference
//! - `ResolveStage` / `ResolveOutcome` - Resolution pipeline lifecycle

mod config;
mod error;
mod lifecycle;
mod mime;
mod request;

pub use config::*;
pub use error::*;
pub use lifecycle::*;
pub use mime::*;
pub use request::*;

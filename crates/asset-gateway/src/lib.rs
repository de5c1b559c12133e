//! Multi-tenant static asset resolution and caching gateway.
//!
//! This crate provides the edge request handler:
//! - `Gateway` - Cache-first, multi-origin-fallback resolution pipeline
//! - `OriginClient` - Primary CDN origin capability (Spin HTTP impl included)
//! - `GatewayResponse` / `Resolution` / `CacheFill` - Handler outputs
//!
//! Resolution order for `GET https://<tenant>.<base-domain>/<path>`:
//! tenant table, shared response cache, primary CDN origin, object store
//! (with directory-index and SPA fallbacks), then a plain-text 404. The
//! first success wins; a cache hit never re-validates against origin.
//!
//! # Example
//!
//! ```ignore
//! use asset_core::{AssetRequest, GatewayConfig, Method};
//! use asset_cache::InMemoryResponseCache;
//! use asset_gateway::{Gateway, HttpOriginClient};
//! use asset_store::InMemoryObjectStore;
//!
//! let config = GatewayConfig::new("basedomain.com", "https://cdn.example.net")
//!     .with_tenant("acme", "acme_site");
//!
//! let gateway = Gateway::new(
//!     config,
//!     InMemoryResponseCache::new(),
//!     InMemoryObjectStore::new(),
//!     HttpOriginClient::new(),
//! );
//!
//! let request = AssetRequest::new(Method::Get, "acme.basedomain.com", "/logo.png");
//! let resolution = gateway.handle(&request).await;
//! // hand resolution.response to the client, then:
//! gateway.complete_cache_fill(&request, resolution.cache_fill).await;
//! ```

mod origin;
mod pipeline;
mod response;

pub use origin::*;
pub use pipeline::*;
pub use response::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CacheFill, Gateway, GatewayResponse, HttpOriginClient, OriginClient, OriginError,
        OriginResponse, Resolution,
    };
}

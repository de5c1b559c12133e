//! Gateway response types and header constants.

use asset_cache::{CacheKey, CachedResponse, CacheStatus};
use asset_core::{NotFoundCause, ResolveOutcome};

/// Response header names and fixed values.
pub mod headers {
    /// Diagnostic header distinguishing cache hits from fresh fetches.
    pub const WORKER_CACHE: &str = "x-worker-cache";
    /// Request ID echo for tracing.
    pub const REQUEST_ID: &str = "x-request-id";
    /// Cache-control value for successfully resolved assets.
    pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";
}

/// An HTTP response produced by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl GatewayResponse {
    /// Create a response with no headers or body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Set the body bytes.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace a header value, appending if absent.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    /// Plain-text 404.
    pub fn not_found(body: &str, request_id: &str) -> Self {
        Self::new(404)
            .with_header("content-type", "text/plain")
            .with_header(headers::WORKER_CACHE, CacheStatus::Miss.to_string())
            .with_header(headers::REQUEST_ID, request_id)
            .with_body(body.as_bytes().to_vec())
    }

    /// Rehydrate a stored entry, flipping its cache marker to HIT.
    pub fn from_cached(entry: CachedResponse) -> Self {
        let mut entry = entry;
        entry.set_header(headers::WORKER_CACHE, CacheStatus::Hit.to_string());
        Self {
            status: entry.status,
            headers: entry.headers,
            body: entry.body,
        }
    }

    /// The stored form of this response.
    pub fn to_cached(&self) -> CachedResponse {
        let mut entry = CachedResponse::new(self.status).with_body(self.body.clone());
        for (name, value) in &self.headers {
            entry = entry.with_header(name.clone(), value.clone());
        }
        entry
    }
}

/// A pending cache write produced by a successful miss-path fetch.
///
/// The response path never awaits this; the embedding layer completes it
/// after the response has been handed to the client.
#[derive(Debug, Clone)]
pub struct CacheFill {
    /// Key the entry is stored under.
    pub key: CacheKey,
    /// Entry to store.
    pub entry: CachedResponse,
}

/// Result of resolving one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Response to hand to the client.
    pub response: GatewayResponse,
    /// Terminal outcome, for logs and metrics.
    pub outcome: ResolveOutcome,
    /// Pending cache write, present only on the miss path.
    pub cache_fill: Option<CacheFill>,
}

impl Resolution {
    /// A not-found terminal for an unmapped tenant.
    pub fn tenant_not_found(request_id: &str) -> Self {
        Self {
            response: GatewayResponse::not_found("Site not found", request_id),
            outcome: ResolveOutcome::NotFound(NotFoundCause::Tenant),
            cache_fill: None,
        }
    }

    /// A not-found terminal for an unresolved asset.
    pub fn asset_not_found(request_id: &str) -> Self {
        Self {
            response: GatewayResponse::not_found("Not found", request_id),
            outcome: ResolveOutcome::NotFound(NotFoundCause::Asset),
            cache_fill: None,
        }
    }
}

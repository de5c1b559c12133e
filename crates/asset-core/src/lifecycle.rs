//! Resolution pipeline lifecycle.

/// Stages of the resolution pipeline, in execution order.
///
/// The pipeline is linear: no retries within a stage, no backtracking once a
/// later stage begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    /// Derive the tenant prefix from the Host header.
    ResolveTenant,
    /// Look up the full request URL in the shared response cache.
    CheckCache,
    /// Fetch from the primary CDN origin.
    FetchOrigin,
    /// Fetch from the tenant's object store, with path-rewrite retries.
    FetchStore,
}

impl ResolveStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveStage::ResolveTenant => "resolve_tenant",
            ResolveStage::CheckCache => "check_cache",
            ResolveStage::FetchOrigin => "fetch_origin",
            ResolveStage::FetchStore => "fetch_store",
        }
    }
}

impl std::fmt::Display for ResolveStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a request resolved to not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundCause {
    /// Host subdomain absent from the tenant table.
    Tenant,
    /// All resolution stages exhausted without a match.
    Asset,
}

/// Terminal outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Served from the shared response cache.
    CacheHit,
    /// Served from the primary CDN origin.
    OriginHit,
    /// Served from the object store (direct key or fallback variant).
    StoreHit,
    /// Nothing matched.
    NotFound(NotFoundCause),
}

impl ResolveOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveOutcome::CacheHit => "cache_hit",
            ResolveOutcome::OriginHit => "origin_hit",
            ResolveOutcome::StoreHit => "store_hit",
            ResolveOutcome::NotFound(NotFoundCause::Tenant) => "tenant_not_found",
            ResolveOutcome::NotFound(NotFoundCause::Asset) => "asset_not_found",
        }
    }

    /// Whether this outcome carries an asset body.
    pub fn is_success(&self) -> bool {
        !matches!(self, ResolveOutcome::NotFound(_))
    }
}

impl std::fmt::Display for ResolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

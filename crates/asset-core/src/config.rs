//! Gateway configuration and tenant mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Static mapping from subdomain label to storage key prefix.
///
/// Lookups are exact-match and case-sensitive. A subdomain without an entry
/// has no prefix and must not resolve to any object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantMap {
    tenants: HashMap<String, String>,
}

impl TenantMap {
    /// Create an empty tenant map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tenant mapping.
    pub fn with_tenant(
        mut self,
        subdomain: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.tenants.insert(subdomain.into(), prefix.into());
        self
    }

    /// Look up the storage key prefix for a subdomain label.
    pub fn prefix_for(&self, subdomain: &str) -> Option<&str> {
        self.tenants.get(subdomain).map(|s| s.as_str())
    }

    /// Number of configured tenants.
    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    /// Whether any tenants are configured.
    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

/// Configuration for the asset gateway.
///
/// Built once at deployment start and passed into the gateway's construction;
/// immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base domain that tenant hosts must end with (e.g. "basedomain.com").
    pub base_domain: String,
    /// Base URL of the primary CDN origin (e.g. "https://cdn.example.net").
    pub origin_base_url: String,
    /// Tenant subdomain to storage prefix table.
    #[serde(default)]
    pub tenants: TenantMap,
}

impl GatewayConfig {
    /// Create a new configuration with an empty tenant map.
    pub fn new(base_domain: impl Into<String>, origin_base_url: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            origin_base_url: origin_base_url.into(),
            tenants: TenantMap::new(),
        }
    }

    /// Add a tenant mapping.
    pub fn with_tenant(
        mut self,
        subdomain: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.tenants = self.tenants.with_tenant(subdomain, prefix);
        self
    }

    /// Extract the subdomain label from a Host header value.
    ///
    /// An explicit `:port` is stripped first. The host must end with
    /// `.<base_domain>`; the bare base domain carries no subdomain.
    pub fn subdomain_of<'a>(&self, host: &'a str) -> Option<&'a str> {
        let host = host.split(':').next().unwrap_or(host);
        let label = host
            .strip_suffix(self.base_domain.as_str())?
            .strip_suffix('.')?;
        if label.is_empty() {
            None
        } else {
            Some(label)
        }
    }

    /// Resolve the storage key prefix for a Host header value.
    pub fn tenant_prefix(&self, host: &str) -> Option<&str> {
        let subdomain = self.subdomain_of(host)?;
        self.tenants.prefix_for(subdomain)
    }
}

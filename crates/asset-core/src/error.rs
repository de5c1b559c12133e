//! Error types for the asset gateway core.

use thiserror::Error;

/// Errors surfaced by the gateway core.
///
/// Only the two not-found conditions ever reach a client; everything else in
/// the pipeline is absorbed into fallback.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Host subdomain absent from the tenant table.
    #[error("no tenant mapped for host: {0}")]
    TenantNotFound(String),

    /// All resolution stages exhausted without a match.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Invalid gateway configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

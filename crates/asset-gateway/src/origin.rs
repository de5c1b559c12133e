//! Primary origin fetch capability.

use async_trait::async_trait;

use asset_core::Method;

/// Error type for origin fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum OriginError {
    /// Non-2xx HTTP status from the origin.
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("connection error: {0}")]
    Connection(String),

    /// Malformed outbound request.
    #[error("request error: {0}")]
    Request(String),
}

/// Response from the primary origin.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl OriginResponse {
    /// Whether the origin answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability for fetching from the primary CDN origin.
///
/// The gateway forwards the original request's method and headers verbatim.
/// Implementations report non-2xx statuses as `Ok` responses; `Err` is
/// reserved for transport failures. The pipeline treats both the same way.
#[async_trait(?Send)]
pub trait OriginClient {
    /// Fetch `url`, forwarding the given method and headers.
    async fn fetch(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<OriginResponse, OriginError>;
}

/// Origin client backed by the platform's outbound HTTP host call.
#[derive(Debug, Clone, Default)]
pub struct HttpOriginClient;

impl HttpOriginClient {
    /// Create a new client.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl OriginClient for HttpOriginClient {
    #[cfg(target_arch = "wasm32")]
    async fn fetch(
        &self,
        method: Method,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<OriginResponse, OriginError> {
        use spin_sdk::http::{Method as SpinMethod, Request};

        let method = match method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Patch => SpinMethod::Patch,
            Method::Delete => SpinMethod::Delete,
            Method::Head => SpinMethod::Head,
            Method::Options => SpinMethod::Options,
        };

        let mut request = Request::builder();
        request.method(method);
        request.uri(url);
        for (key, value) in headers {
            request.header(key.as_str(), value.as_str());
        }

        let response: spin_sdk::http::Response = spin_sdk::http::send(request.build())
            .await
            .map_err(|e| OriginError::Connection(e.to_string()))?;

        let status = *response.status();
        let headers: Vec<(String, String)> = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.into_body();

        Ok(OriginResponse {
            status,
            headers,
            body,
        })
    }

    /// Non-WASM stub: no outbound HTTP host call is available, so every
    /// fetch reports a transport failure and the pipeline falls through.
    #[cfg(not(target_arch = "wasm32"))]
    async fn fetch(
        &self,
        _method: Method,
        url: &str,
        _headers: &[(String, String)],
    ) -> Result<OriginResponse, OriginError> {
        Err(OriginError::Connection(format!(
            "outbound http unavailable for {url}"
        )))
    }
}

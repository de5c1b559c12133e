//! Edge worker serving multi-tenant storefront assets.
//!
//! This workload wires the asset gateway to Spin's HTTP trigger:
//! - Tenant table and origin endpoint baked into the deployment config
//! - Response cache and object store backed by Spin Key-Value stores
//! - Response handed to the client before the cache fill runs, so the
//!   write never delays the caller

use asset_cache::KvResponseCache;
use asset_core::{AssetRequest, GatewayConfig, Method};
use asset_gateway::{Gateway, HttpOriginClient};
use asset_observability::LogLevel;
use asset_store::KvObjectStore;
use futures::SinkExt;
use spin_sdk::http::{Fields, IncomingRequest, OutgoingResponse, ResponseOutparam};
use spin_sdk::http_component;

/// KV store holding tenant objects, separate from the default cache store.
const OBJECT_STORE_NAME: &str = "assets";

/// Deployment configuration for the storefront fleet.
fn gateway_config() -> GatewayConfig {
    GatewayConfig::new("storefront-edge.com", "https://cdn.storefront-edge.com")
        .with_tenant("acme", "acme_site")
        .with_tenant("globex", "globex_store")
        .with_tenant("initech", "initech_shop")
}

/// Main HTTP handler.
#[http_component]
async fn handle_asset(req: IncomingRequest, response_out: ResponseOutparam) {
    let method = map_method(&req.method());
    let path_and_query = req.path_with_query().unwrap_or_default();

    let host = req
        .headers()
        .get(&"host".to_string())
        .first()
        .map(|v| String::from_utf8_lossy(v).to_string())
        .unwrap_or_default();

    let forwarded: Vec<(String, String)> = req
        .headers()
        .entries()
        .into_iter()
        .map(|(name, value)| (name, String::from_utf8_lossy(&value).to_string()))
        .collect();

    let request = AssetRequest::new(method, host, &path_and_query).with_headers(forwarded);

    let gateway = Gateway::new(
        gateway_config(),
        KvResponseCache::open_default().unwrap(),
        KvObjectStore::open(OBJECT_STORE_NAME).unwrap(),
        HttpOriginClient::new(),
    )
    .with_min_log_level(LogLevel::Info);

    let resolution = gateway.handle(&request).await;

    let header_list: Vec<(String, Vec<u8>)> = resolution
        .response
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), value.clone().into_bytes()))
        .collect();
    let headers = Fields::from_list(&header_list).unwrap();

    let response = OutgoingResponse::new(headers);
    response.set_status_code(resolution.response.status).unwrap();

    let mut body = response.take_body();
    response_out.set(response);
    let _ = body.send(resolution.response.body.clone()).await;

    // The client already has its response; the fill runs after.
    gateway
        .complete_cache_fill(&request, resolution.cache_fill)
        .await;
}

fn map_method(method: &spin_sdk::http::Method) -> Method {
    use spin_sdk::http::Method as SpinMethod;

    match method {
        SpinMethod::Get => Method::Get,
        SpinMethod::Head => Method::Head,
        SpinMethod::Post => Method::Post,
        SpinMethod::Put => Method::Put,
        SpinMethod::Patch => Method::Patch,
        SpinMethod::Delete => Method::Delete,
        SpinMethod::Options => Method::Options,
        _ => Method::Get,
    }
}

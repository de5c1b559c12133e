//! The resolution pipeline.

use asset_cache::{CacheKey, CacheStatus, ResponseCache};
use asset_core::{
    content_type_for, has_extension, AssetRequest, GatewayConfig, ResolveOutcome,
};
use asset_observability::{LogFormat, LogLevel, StructuredLogger};
use asset_store::ObjectStore;

use crate::origin::OriginClient;
use crate::response::{headers, CacheFill, GatewayResponse, Resolution};

/// The edge asset gateway.
///
/// Generic over its three injected capabilities so deployments wire in the
/// platform cache/store/origin and tests substitute in-memory fakes. The
/// configuration is read-only for the gateway's lifetime.
pub struct Gateway<C, S, O> {
    config: GatewayConfig,
    cache: C,
    store: S,
    origin: O,
    log_format: LogFormat,
    min_log_level: LogLevel,
}

impl<C, S, O> Gateway<C, S, O>
where
    C: ResponseCache,
    S: ObjectStore,
    O: OriginClient,
{
    /// Create a gateway from its configuration and capabilities.
    pub fn new(config: GatewayConfig, cache: C, store: S, origin: O) -> Self {
        Self {
            config,
            cache,
            store,
            origin,
            log_format: LogFormat::Json,
            min_log_level: LogLevel::Info,
        }
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Set the minimum log level.
    pub fn with_min_log_level(mut self, level: LogLevel) -> Self {
        self.min_log_level = level;
        self
    }

    /// Gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Resolve one request to a response.
    ///
    /// Stages run strictly in order and short-circuit on first success; a
    /// cache hit never re-validates against origin. The returned
    /// `cache_fill` is not awaited here - complete it after the response has
    /// been handed to the client (see [`Self::complete_cache_fill`]).
    pub async fn handle(&self, request: &AssetRequest) -> Resolution {
        let request_id = request.request_id.to_string();
        let mut logger = StructuredLogger::new(request.request_id.clone())
            .with_path(request.path.clone())
            .with_format(self.log_format)
            .with_min_level(self.min_log_level);

        // RESOLVE_TENANT
        let Some(subdomain) = self.config.subdomain_of(&request.host) else {
            logger
                .warn_builder("host outside base domain")
                .field("host", request.host.clone())
                .emit();
            return Resolution::tenant_not_found(&request_id);
        };
        logger = logger.with_tenant(subdomain);
        let Some(prefix) = self.config.tenants.prefix_for(subdomain) else {
            logger.warn("tenant not configured");
            return Resolution::tenant_not_found(&request_id);
        };

        if request.has_traversal() {
            logger.warn("rejected path with dot-dot segment");
            return Resolution::asset_not_found(&request_id);
        }

        // CHECK_CACHE
        let key = CacheKey::for_request(request);
        match self.cache.get(&key).await {
            Ok(Some(entry)) => {
                self.log_outcome(&logger, ResolveOutcome::CacheHit, entry.status);
                let mut response = GatewayResponse::from_cached(entry);
                response.set_header(headers::REQUEST_ID, request_id);
                return Resolution {
                    response,
                    outcome: ResolveOutcome::CacheHit,
                    cache_fill: None,
                };
            }
            Ok(None) => {}
            Err(e) => {
                // Degrade to the miss path; the cache is best-effort.
                logger
                    .warn_builder("cache read failed")
                    .field("error", e.to_string())
                    .emit();
            }
        }

        // FETCH_PRIMARY_ORIGIN
        let origin_url = format!(
            "{}/{}{}",
            self.config.origin_base_url.trim_end_matches('/'),
            prefix,
            request.path
        );
        match self
            .origin
            .fetch(request.method, &origin_url, &request.headers)
            .await
        {
            Ok(response) if response.is_success() => {
                let content_type = content_type_for(&request.path);
                let (response, fill) =
                    self.success(&request_id, &key, response.status, content_type, response.body);
                self.log_outcome(&logger, ResolveOutcome::OriginHit, response.status);
                return Resolution {
                    response,
                    outcome: ResolveOutcome::OriginHit,
                    cache_fill: Some(fill),
                };
            }
            Ok(response) => {
                logger
                    .debug_builder("origin returned non-success")
                    .field_i64("status", response.status as i64)
                    .emit();
            }
            Err(e) => {
                // Availability over precision: a transport failure falls
                // through to the object store exactly like a non-2xx.
                logger
                    .warn_builder("origin fetch failed")
                    .field("error", e.to_string())
                    .emit();
            }
        }

        // FETCH_OBJECT_STORE, with up to two path-rewrite retries
        for store_key in self.store_keys(prefix, &request.path) {
            match self.store.get(&store_key).await {
                Ok(Some(object)) => {
                    let content_type = object
                        .content_type
                        .clone()
                        .unwrap_or_else(|| content_type_for(&store_key).to_string());
                    let (response, fill) =
                        self.success(&request_id, &key, 200, &content_type, object.body);
                    self.log_outcome(&logger, ResolveOutcome::StoreHit, 200);
                    return Resolution {
                        response,
                        outcome: ResolveOutcome::StoreHit,
                        cache_fill: Some(fill),
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    logger
                        .warn_builder("object store read failed")
                        .field("key", store_key.clone())
                        .field("error", e.to_string())
                        .emit();
                }
            }
        }

        self.log_outcome(&logger, ResolveOutcome::NotFound(asset_core::NotFoundCause::Asset), 404);
        Resolution::asset_not_found(&request_id)
    }

    /// Complete a pending cache write, swallowing failures.
    ///
    /// Call this after the response has been handed to the client so the
    /// write never delays the response path. A failed put is logged and
    /// discarded.
    pub async fn complete_cache_fill(&self, request: &AssetRequest, fill: Option<CacheFill>) {
        let Some(fill) = fill else {
            return;
        };

        if let Err(e) = self.cache.put(&fill.key, &fill.entry).await {
            let logger = StructuredLogger::new(request.request_id.clone())
                .with_path(request.path.clone())
                .with_format(self.log_format)
                .with_min_level(self.min_log_level);
            logger
                .warn_builder("cache write failed")
                .field("key", fill.key.as_str().to_string())
                .field("error", e.to_string())
                .emit();
        }
    }

    /// Object-store keys to try, in order.
    ///
    /// The direct key always; for extensionless paths also the
    /// directory-index variant and the tenant's SPA root.
    fn store_keys(&self, prefix: &str, path: &str) -> Vec<String> {
        let direct = format!("{}{}", prefix, path);
        if has_extension(path) {
            return vec![direct];
        }

        let dir_index = if path.ends_with('/') {
            format!("{}{}index.html", prefix, path)
        } else {
            format!("{}{}/index.html", prefix, path)
        };
        let spa_root = format!("{}/index.html", prefix);

        vec![direct, dir_index, spa_root]
    }

    fn success(
        &self,
        request_id: &str,
        key: &CacheKey,
        status: u16,
        content_type: &str,
        body: Vec<u8>,
    ) -> (GatewayResponse, CacheFill) {
        let response = GatewayResponse::new(status)
            .with_header("content-type", content_type)
            .with_header("cache-control", headers::CACHE_CONTROL_IMMUTABLE)
            .with_header(headers::WORKER_CACHE, CacheStatus::Miss.to_string())
            .with_header(headers::REQUEST_ID, request_id)
            .with_body(body);

        let fill = CacheFill {
            key: key.clone(),
            entry: response.to_cached(),
        };

        (response, fill)
    }

    fn log_outcome(&self, logger: &StructuredLogger, outcome: ResolveOutcome, status: u16) {
        logger
            .info_builder("request resolved")
            .field("outcome", outcome.as_str())
            .field_i64("status", status as i64)
            .emit();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use asset_cache::{CachedResponse, InMemoryResponseCache};
    use asset_core::Method;
    use asset_store::{InMemoryObjectStore, StoreError, StoredObject};

    use super::*;
    use crate::origin::{OriginError, OriginResponse};

    /// Origin fake returning scripted responses and recording every fetch.
    #[derive(Default)]
    struct ScriptedOrigin {
        responses: Mutex<HashMap<String, (u16, Vec<u8>)>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedOrigin {
        fn new() -> Self {
            Self::default()
        }

        fn with_response(self, url: &str, status: u16, body: &[u8]) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(url.to_string(), (status, body.to_vec()));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
        }

        fn last_headers(&self) -> Vec<(String, String)> {
            self.calls
                .lock()
                .unwrap()
                .last()
                .map(|(_, h)| h.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl OriginClient for ScriptedOrigin {
        async fn fetch(
            &self,
            _method: Method,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<OriginResponse, OriginError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), headers.to_vec()));

            match self.responses.lock().unwrap().get(url) {
                Some((status, body)) => Ok(OriginResponse {
                    status: *status,
                    headers: Vec::new(),
                    body: body.clone(),
                }),
                None => Err(OriginError::Connection("no route to origin".to_string())),
            }
        }
    }

    /// Store fake recording every key lookup.
    #[derive(Default)]
    struct RecordingStore {
        objects: Mutex<HashMap<String, StoredObject>>,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self::default()
        }

        fn with_object(self, key: &str, object: StoredObject) -> Self {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), object);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl ObjectStore for RecordingStore {
        async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
            self.calls.lock().unwrap().push(key.to_string());
            Ok(self.objects.lock().unwrap().get(key).cloned())
        }
    }

    /// Cache fake whose reads and writes always fail.
    struct FailingCache;

    #[async_trait::async_trait(?Send)]
    impl ResponseCache for FailingCache {
        async fn get(
            &self,
            _key: &CacheKey,
        ) -> Result<Option<CachedResponse>, asset_cache::CacheError> {
            Err(asset_cache::CacheError::Storage("backend down".to_string()))
        }

        async fn put(
            &self,
            _key: &CacheKey,
            _entry: &CachedResponse,
        ) -> Result<(), asset_cache::CacheError> {
            Err(asset_cache::CacheError::Storage("backend down".to_string()))
        }
    }

    fn config() -> GatewayConfig {
        GatewayConfig::new("basedomain.com", "https://cdn.example.net")
            .with_tenant("acme", "acme_site")
    }

    fn request(host: &str, path: &str) -> AssetRequest {
        AssetRequest::new(Method::Get, host, path)
    }

    #[tokio::test]
    async fn test_unmapped_subdomain_is_404_with_no_io() {
        let origin = ScriptedOrigin::new();
        let store = RecordingStore::new();
        let gateway = Gateway::new(config(), InMemoryResponseCache::new(), store, origin);

        let resolution = gateway
            .handle(&request("unknown.basedomain.com", "/x"))
            .await;

        assert_eq!(resolution.response.status, 404);
        assert_eq!(resolution.response.body, b"Site not found");
        assert_eq!(
            resolution.response.header("content-type"),
            Some("text/plain")
        );
        assert!(resolution.cache_fill.is_none());
        assert!(gateway.origin.calls().is_empty());
        assert!(gateway.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_host_is_404_with_no_io() {
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            RecordingStore::new(),
            ScriptedOrigin::new(),
        );

        let resolution = gateway.handle(&request("acme.elsewhere.com", "/x")).await;

        assert_eq!(resolution.response.status, 404);
        assert!(gateway.origin.calls().is_empty());
        assert!(gateway.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits() {
        let cache = InMemoryResponseCache::new();
        let req = request("acme.basedomain.com", "/logo.png");
        let key = CacheKey::for_request(&req);
        let entry = CachedResponse::new(200)
            .with_header("content-type", "image/png")
            .with_header(headers::WORKER_CACHE, "MISS")
            .with_body(b"cached-bytes".to_vec());
        cache.put(&key, &entry).await.unwrap();

        let gateway = Gateway::new(config(), cache, RecordingStore::new(), ScriptedOrigin::new());
        let resolution = gateway.handle(&req).await;

        assert_eq!(resolution.outcome, ResolveOutcome::CacheHit);
        assert_eq!(resolution.response.body, b"cached-bytes");
        assert_eq!(
            resolution.response.header(headers::WORKER_CACHE),
            Some("HIT")
        );
        assert!(resolution.cache_fill.is_none());
        assert!(gateway.origin.calls().is_empty());
        assert!(gateway.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_origin_hit_sets_miss_headers() {
        let origin = ScriptedOrigin::new().with_response(
            "https://cdn.example.net/acme_site/logo.png",
            200,
            b"image-bytes",
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            RecordingStore::new(),
            origin,
        );

        let req = request("acme.basedomain.com", "/logo.png");
        let resolution = gateway.handle(&req).await;

        assert_eq!(resolution.outcome, ResolveOutcome::OriginHit);
        assert_eq!(resolution.response.status, 200);
        assert_eq!(resolution.response.body, b"image-bytes");
        assert_eq!(
            resolution.response.header("content-type"),
            Some("image/png")
        );
        assert_eq!(
            resolution.response.header("cache-control"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(
            resolution.response.header(headers::WORKER_CACHE),
            Some("MISS")
        );
        assert!(resolution.response.header(headers::REQUEST_ID).is_some());
        assert!(resolution.cache_fill.is_some());
        assert!(gateway.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_after_fill_is_byte_identical_hit() {
        let origin = ScriptedOrigin::new().with_response(
            "https://cdn.example.net/acme_site/logo.png",
            200,
            b"image-bytes",
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            RecordingStore::new(),
            origin,
        );

        let req = request("acme.basedomain.com", "/logo.png");
        let first = gateway.handle(&req).await;
        assert_eq!(first.outcome, ResolveOutcome::OriginHit);
        gateway.complete_cache_fill(&req, first.cache_fill).await;

        let again = request("acme.basedomain.com", "/logo.png");
        let second = gateway.handle(&again).await;

        assert_eq!(second.outcome, ResolveOutcome::CacheHit);
        assert_eq!(second.response.body, first.response.body);
        assert_eq!(
            second.response.header(headers::WORKER_CACHE),
            Some("HIT")
        );
        // Only the first request reached the origin.
        assert_eq!(gateway.origin.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_origin_forwards_request_headers() {
        let origin = ScriptedOrigin::new().with_response(
            "https://cdn.example.net/acme_site/logo.png",
            200,
            b"x",
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            RecordingStore::new(),
            origin,
        );

        let req = request("acme.basedomain.com", "/logo.png")
            .with_header("accept-encoding", "gzip")
            .with_header("user-agent", "storefront-e2e");
        gateway.handle(&req).await;

        let forwarded = gateway.origin.last_headers();
        assert!(forwarded.contains(&("accept-encoding".to_string(), "gzip".to_string())));
        assert!(forwarded.contains(&("user-agent".to_string(), "storefront-e2e".to_string())));
    }

    #[tokio::test]
    async fn test_non_success_origin_falls_through_to_store() {
        let origin = ScriptedOrigin::new().with_response(
            "https://cdn.example.net/acme_site/logo.png",
            502,
            b"",
        );
        let store = RecordingStore::new().with_object(
            "acme_site/logo.png",
            StoredObject::new(b"stored-bytes".to_vec()),
        );
        let gateway = Gateway::new(config(), InMemoryResponseCache::new(), store, origin);

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/logo.png"))
            .await;

        assert_eq!(resolution.outcome, ResolveOutcome::StoreHit);
        assert_eq!(resolution.response.body, b"stored-bytes");
        assert_eq!(
            resolution.response.header(headers::WORKER_CACHE),
            Some("MISS")
        );
        assert!(resolution.cache_fill.is_some());
    }

    #[tokio::test]
    async fn test_origin_transport_error_falls_through_to_store() {
        // No scripted response: every origin fetch errors.
        let store = RecordingStore::new().with_object(
            "acme_site/logo.png",
            StoredObject::new(b"stored-bytes".to_vec()),
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            store,
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/logo.png"))
            .await;

        assert_eq!(resolution.outcome, ResolveOutcome::StoreHit);
        assert_eq!(resolution.response.body, b"stored-bytes");
    }

    #[tokio::test]
    async fn test_directory_index_fallback() {
        let store = RecordingStore::new().with_object(
            "acme_site/about/index.html",
            StoredObject::new(b"<html>about</html>".to_vec()),
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            store,
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/about"))
            .await;

        assert_eq!(resolution.outcome, ResolveOutcome::StoreHit);
        assert_eq!(resolution.response.body, b"<html>about</html>");
        assert_eq!(resolution.response.header("content-type"), Some("text/html"));
        assert_eq!(
            gateway.store.calls(),
            vec![
                "acme_site/about".to_string(),
                "acme_site/about/index.html".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_directory_index_with_trailing_slash() {
        let store = RecordingStore::new().with_object(
            "acme_site/about/index.html",
            StoredObject::new(b"<html>about</html>".to_vec()),
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            store,
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/about/"))
            .await;

        assert_eq!(resolution.outcome, ResolveOutcome::StoreHit);
        assert_eq!(
            gateway.store.calls(),
            vec![
                "acme_site/about/".to_string(),
                "acme_site/about/index.html".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_spa_fallback_serves_root_index() {
        let store = RecordingStore::new().with_object(
            "acme_site/index.html",
            StoredObject::new(b"<html>spa</html>".to_vec()),
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            store,
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/dashboard"))
            .await;

        assert_eq!(resolution.outcome, ResolveOutcome::StoreHit);
        assert_eq!(resolution.response.body, b"<html>spa</html>");
        assert_eq!(resolution.response.header("content-type"), Some("text/html"));
        assert_eq!(
            gateway.store.calls(),
            vec![
                "acme_site/dashboard".to_string(),
                "acme_site/dashboard/index.html".to_string(),
                "acme_site/index.html".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_extensionful_path_gets_no_rewrite_retries() {
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            RecordingStore::new(),
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/missing.js"))
            .await;

        assert_eq!(resolution.response.status, 404);
        assert_eq!(resolution.response.body, b"Not found");
        assert_eq!(gateway.store.calls(), vec!["acme_site/missing.js".to_string()]);
    }

    #[tokio::test]
    async fn test_traversal_path_is_rejected_before_any_io() {
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            RecordingStore::new(),
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/../other_tenant/secret.txt"))
            .await;

        assert_eq!(resolution.response.status, 404);
        assert!(gateway.origin.calls().is_empty());
        assert!(gateway.store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cache_read_failure_degrades_to_miss_path() {
        let origin = ScriptedOrigin::new().with_response(
            "https://cdn.example.net/acme_site/logo.png",
            200,
            b"image-bytes",
        );
        let gateway = Gateway::new(config(), FailingCache, RecordingStore::new(), origin);

        let req = request("acme.basedomain.com", "/logo.png");
        let resolution = gateway.handle(&req).await;

        assert_eq!(resolution.outcome, ResolveOutcome::OriginHit);
        assert_eq!(resolution.response.body, b"image-bytes");

        // The fill write also fails; it must be swallowed.
        gateway.complete_cache_fill(&req, resolution.cache_fill).await;
    }

    #[tokio::test]
    async fn test_stored_content_type_wins_over_extension() {
        let store = RecordingStore::new().with_object(
            "acme_site/download",
            StoredObject::new(b"bytes".to_vec()).with_content_type("application/pdf"),
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            store,
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/download"))
            .await;

        assert_eq!(
            resolution.response.header("content-type"),
            Some("application/pdf")
        );
    }

    #[tokio::test]
    async fn test_store_hit_with_in_memory_store() {
        let store = InMemoryObjectStore::new().with_object(
            "acme_site/styles/site.css",
            StoredObject::new(b"body{}".to_vec()),
        );
        let gateway = Gateway::new(
            config(),
            InMemoryResponseCache::new(),
            store,
            ScriptedOrigin::new(),
        );

        let resolution = gateway
            .handle(&request("acme.basedomain.com", "/styles/site.css"))
            .await;

        assert_eq!(resolution.outcome, ResolveOutcome::StoreHit);
        assert_eq!(resolution.response.header("content-type"), Some("text/css"));
    }
}

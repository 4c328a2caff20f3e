//! Offline cache strategy tests with a scripted network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use habitloop_core::cache::{
    CacheOutcome, CacheRequest, CachedResponse, FetchError, Fetcher, OfflineCache, RequestKind,
    STATIC_CACHE,
};
use url::Url;

/// Fetcher with a switchable network and scripted bodies per URL.
struct ScriptedFetcher {
    online: AtomicBool,
    bodies: Mutex<HashMap<String, String>>,
}

impl ScriptedFetcher {
    fn new() -> Arc<Self> {
        Arc::new(ScriptedFetcher {
            online: AtomicBool::new(true),
            bodies: Mutex::new(HashMap::new()),
        })
    }

    fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn script(&self, url: &str, body: &str) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(FetchError("network unreachable".to_string()));
        }
        let bodies = self.bodies.lock().unwrap();
        let body = bodies
            .get(request.url.as_str())
            .cloned()
            .unwrap_or_else(|| "default body".to_string());
        Ok(CachedResponse {
            status: 200,
            content_type: "text/html".to_string(),
            body: body.into_bytes(),
        })
    }
}

fn origin() -> Url {
    Url::parse("https://app.example.test").unwrap()
}

fn url(path: &str) -> Url {
    origin().join(path).unwrap()
}

fn cache_with(fetcher: Arc<ScriptedFetcher>) -> OfflineCache {
    OfflineCache::new(origin(), fetcher).bypass_host("backend.example.test")
}

fn body_of(outcome: CacheOutcome) -> String {
    match outcome {
        CacheOutcome::Response(response) => String::from_utf8(response.body).unwrap(),
        CacheOutcome::Passthrough => panic!("expected a response, got passthrough"),
    }
}

#[tokio::test]
async fn non_get_requests_pass_through() {
    let fetcher = ScriptedFetcher::new();
    let cache = cache_with(fetcher);
    let request = CacheRequest {
        method: reqwest::Method::POST,
        url: url("/api/anything"),
        kind: RequestKind::Other,
    };
    assert_eq!(cache.handle(&request).await.unwrap(), CacheOutcome::Passthrough);
}

#[tokio::test]
async fn cross_origin_requests_pass_through() {
    let fetcher = ScriptedFetcher::new();
    let cache = cache_with(fetcher);
    let request = CacheRequest::get(
        Url::parse("https://elsewhere.test/image.png").unwrap(),
        RequestKind::Image,
    );
    assert_eq!(cache.handle(&request).await.unwrap(), CacheOutcome::Passthrough);
}

#[tokio::test]
async fn backend_api_requests_pass_through() {
    let fetcher = ScriptedFetcher::new();
    let cache = OfflineCache::new(origin(), fetcher).bypass_host("app.example.test");
    // Same origin, but the host is bypassed as the backend API host.
    let request = CacheRequest::get(url("/rest/v1/habits"), RequestKind::Other);
    assert_eq!(cache.handle(&request).await.unwrap(), CacheOutcome::Passthrough);
}

#[tokio::test]
async fn navigation_prefers_the_network_and_caches_the_result() {
    let fetcher = ScriptedFetcher::new();
    fetcher.script(url("/habits").as_str(), "fresh page");
    let cache = cache_with(Arc::clone(&fetcher));

    let request = CacheRequest::get(url("/habits"), RequestKind::Navigation);
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "fresh page");

    // Offline now: the cached copy from the successful pass serves.
    fetcher.set_online(false);
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "fresh page");
}

#[tokio::test]
async fn offline_navigation_falls_back_to_the_shell() {
    let fetcher = ScriptedFetcher::new();
    fetcher.script(url("/").as_str(), "app shell");
    let cache = cache_with(Arc::clone(&fetcher));
    cache
        .precache(&["/".to_string()])
        .await
        .unwrap();

    fetcher.set_online(false);
    let request = CacheRequest::get(url("/never-visited"), RequestKind::Navigation);
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "app shell");
}

#[tokio::test]
async fn offline_navigation_with_no_cache_fails_visibly() {
    let fetcher = ScriptedFetcher::new();
    fetcher.set_online(false);
    let cache = cache_with(fetcher);

    let request = CacheRequest::get(url("/anywhere"), RequestKind::Navigation);
    assert!(cache.handle(&request).await.is_err());
}

#[tokio::test]
async fn assets_are_served_cache_first() {
    let fetcher = ScriptedFetcher::new();
    fetcher.script(url("/styles.css").as_str(), "v1");
    let cache = cache_with(Arc::clone(&fetcher));

    let request = CacheRequest::get(url("/styles.css"), RequestKind::Other);
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "v1");

    // The network now has v2, but the cached copy answers first.
    fetcher.script(url("/styles.css").as_str(), "v2");
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "v1");

    // The background refresh eventually replaces the entry.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    fetcher.set_online(false);
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "v2");
}

#[tokio::test]
async fn offline_image_miss_gets_a_placeholder() {
    let fetcher = ScriptedFetcher::new();
    fetcher.set_online(false);
    let cache = cache_with(fetcher);

    let request = CacheRequest::get(url("/photos/1.png"), RequestKind::Image);
    let outcome = cache.handle(&request).await.unwrap();
    match outcome {
        CacheOutcome::Response(response) => {
            assert_eq!(response.content_type, "image/svg+xml");
            assert!(String::from_utf8(response.body).unwrap().contains("Offline"));
        }
        CacheOutcome::Passthrough => panic!("expected placeholder"),
    }
}

#[tokio::test]
async fn offline_asset_miss_fails_visibly() {
    let fetcher = ScriptedFetcher::new();
    fetcher.set_online(false);
    let cache = cache_with(fetcher);

    let request = CacheRequest::get(url("/data.json"), RequestKind::Other);
    assert!(cache.handle(&request).await.is_err());
}

#[tokio::test]
async fn precache_fills_the_static_bucket() {
    let fetcher = ScriptedFetcher::new();
    fetcher.script(url("/").as_str(), "shell");
    fetcher.script(url("/habits").as_str(), "habits page");
    let cache = cache_with(Arc::clone(&fetcher));

    let stored = cache
        .precache(&["/".to_string(), "/habits".to_string()])
        .await
        .unwrap();
    assert_eq!(stored, 2);

    fetcher.set_online(false);
    let request = CacheRequest::get(url("/habits"), RequestKind::Other);
    assert_eq!(body_of(cache.handle(&request).await.unwrap()), "habits page");
}

#[tokio::test]
async fn purge_deletes_stale_buckets_wholesale() {
    let fetcher = ScriptedFetcher::new();
    let cache = cache_with(Arc::clone(&fetcher));

    cache.seed(
        "habitloop-static-v0",
        url("/old.css"),
        CachedResponse {
            status: 200,
            content_type: "text/css".to_string(),
            body: b"old".to_vec(),
        },
    );
    cache.seed(
        STATIC_CACHE,
        url("/current.css"),
        CachedResponse {
            status: 200,
            content_type: "text/css".to_string(),
            body: b"current".to_vec(),
        },
    );

    let removed = cache.purge_stale();
    assert_eq!(removed, vec!["habitloop-static-v0".to_string()]);

    fetcher.set_online(false);
    // The old bucket's entry is gone with the bucket.
    let old = CacheRequest::get(url("/old.css"), RequestKind::Other);
    assert!(cache.handle(&old).await.is_err());
    // Entries in current buckets survive.
    let current = CacheRequest::get(url("/current.css"), RequestKind::Other);
    assert_eq!(body_of(cache.handle(&current).await.unwrap()), "current");

    // Only current bucket names remain; nothing left to purge.
    assert!(cache.purge_stale().is_empty());
}

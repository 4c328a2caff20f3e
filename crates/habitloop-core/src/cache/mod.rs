//! Offline cache layer for same-origin GET traffic.
//!
//! Mirrors the app's caching contract: navigation requests go
//! network-first with a cache (then app-shell) fallback, other GETs go
//! cache-first with a background refresh, and everything that is not a
//! same-origin GET — POSTs, backend API calls, foreign origins — passes
//! through untouched. Eviction is wholesale: stale buckets are deleted
//! by name, never entry by entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Versioned name of the bucket filled at install time.
pub const STATIC_CACHE: &str = "habitloop-static-v1";
/// Versioned name of the bucket filled as responses flow through.
pub const DYNAMIC_CACHE: &str = "habitloop-dynamic-v1";

/// What kind of request is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// A page navigation; gets the shell fallback when offline.
    Navigation,
    /// An image; gets a placeholder when offline.
    Image,
    /// Anything else.
    Other,
}

/// A request passing through the cache layer.
#[derive(Debug, Clone)]
pub struct CacheRequest {
    pub method: reqwest::Method,
    pub url: Url,
    pub kind: RequestKind,
}

impl CacheRequest {
    /// Convenience constructor for a GET request.
    pub fn get(url: Url, kind: RequestKind) -> Self {
        CacheRequest {
            method: reqwest::Method::GET,
            url,
            kind,
        }
    }
}

/// A response as stored in (and served from) the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl CachedResponse {
    /// Placeholder served for image requests when offline.
    pub fn offline_image_placeholder() -> Self {
        const PLACEHOLDER_SVG: &str = concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">"##,
            r##"<rect fill="#f0f0f0" width="100" height="100"/>"##,
            r##"<text fill="#999" font-size="14" x="50%" y="50%" "##,
            r##"text-anchor="middle" dy=".3em">Offline</text></svg>"##
        );
        CachedResponse {
            status: 200,
            content_type: "image/svg+xml".to_string(),
            body: PLACEHOLDER_SVG.as_bytes().to_vec(),
        }
    }
}

/// Transport failure while fetching.
#[derive(Debug, Error)]
#[error("fetch failed: {0}")]
pub struct FetchError(pub String);

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError(err.to_string())
    }
}

/// Cache layer failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Network unavailable and nothing cached to substitute.
    #[error("offline with no cached response for {url}")]
    Offline { url: String },

    /// A URL needed internally (shell path) could not be built.
    #[error("invalid cache URL: {0}")]
    InvalidUrl(String),
}

/// Network port for the cache layer; tests script it, production uses
/// [`HttpFetcher`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError>;
}

/// Fetcher backed by a real HTTP client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &CacheRequest) -> Result<CachedResponse, FetchError> {
        let response = self
            .http
            .request(request.method.clone(), request.url.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = response.bytes().await?.to_vec();
        Ok(CachedResponse {
            status,
            content_type,
            body,
        })
    }
}

/// What the cache layer decided for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOutcome {
    /// Not ours to answer; the caller performs the request itself.
    Passthrough,
    /// A response, from the network or from a cache bucket.
    Response(CachedResponse),
}

type Bucket = HashMap<String, CachedResponse>;

#[derive(Debug, Default)]
struct CacheSet {
    buckets: HashMap<String, Bucket>,
}

impl CacheSet {
    fn put(&mut self, bucket: &str, url: &Url, response: CachedResponse) {
        self.buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(url.as_str().to_string(), response);
    }

    fn lookup(&self, url: &Url) -> Option<CachedResponse> {
        let key = url.as_str();
        self.buckets.values().find_map(|b| b.get(key).cloned())
    }
}

/// Offline cache for same-origin GET requests.
pub struct OfflineCache {
    origin: Url,
    shell_path: String,
    /// Backend hosts whose requests always go to the network untouched.
    bypass_hosts: Vec<String>,
    caches: Arc<Mutex<CacheSet>>,
    fetcher: Arc<dyn Fetcher>,
}

impl OfflineCache {
    pub fn new(origin: Url, fetcher: Arc<dyn Fetcher>) -> Self {
        OfflineCache {
            origin,
            shell_path: "/".to_string(),
            bypass_hosts: Vec::new(),
            caches: Arc::new(Mutex::new(CacheSet::default())),
            fetcher,
        }
    }

    /// Override the app-shell path served as the last navigation fallback.
    pub fn with_shell_path(mut self, path: impl Into<String>) -> Self {
        self.shell_path = path.into();
        self
    }

    /// Always pass requests to `host` through (the backend API host).
    pub fn bypass_host(mut self, host: impl Into<String>) -> Self {
        self.bypass_hosts.push(host.into());
        self
    }

    /// Fill the static bucket with the app shell and core pages.
    ///
    /// Like install-time caching, the first failed asset aborts; anything
    /// already stored stays.
    pub async fn precache(&self, paths: &[String]) -> Result<usize, CacheError> {
        let mut stored = 0;
        for path in paths {
            let url = self
                .origin
                .join(path)
                .map_err(|e| CacheError::InvalidUrl(e.to_string()))?;
            let request = CacheRequest::get(url.clone(), RequestKind::Other);
            match self.fetcher.fetch(&request).await {
                Ok(response) => {
                    self.caches
                        .lock()
                        .unwrap()
                        .put(STATIC_CACHE, &url, response);
                    stored += 1;
                }
                Err(err) => {
                    warn!(%url, "precache aborted: {err}");
                    return Err(CacheError::Offline {
                        url: url.to_string(),
                    });
                }
            }
        }
        debug!(count = stored, "precached static assets");
        Ok(stored)
    }

    /// Delete every bucket whose name is not a current cache name.
    ///
    /// Returns the deleted names. This is the only eviction mechanism.
    pub fn purge_stale(&self) -> Vec<String> {
        let mut caches = self.caches.lock().unwrap();
        let stale: Vec<String> = caches
            .buckets
            .keys()
            .filter(|name| name.as_str() != STATIC_CACHE && name.as_str() != DYNAMIC_CACHE)
            .cloned()
            .collect();
        for name in &stale {
            caches.buckets.remove(name);
            debug!(bucket = %name, "removed stale cache");
        }
        stale
    }

    /// Seed a named bucket directly (tests and migrations from older
    /// cache versions).
    pub fn seed(&self, bucket: &str, url: Url, response: CachedResponse) {
        self.caches.lock().unwrap().put(bucket, &url, response);
    }

    /// Decide and serve one request.
    pub async fn handle(&self, request: &CacheRequest) -> Result<CacheOutcome, CacheError> {
        if request.method != reqwest::Method::GET {
            return Ok(CacheOutcome::Passthrough);
        }
        if !self.same_origin(&request.url) || self.is_bypassed(&request.url) {
            return Ok(CacheOutcome::Passthrough);
        }

        if request.kind == RequestKind::Navigation {
            return self.handle_navigation(request).await;
        }

        // Cache-first for everything else.
        let cached = self.caches.lock().unwrap().lookup(&request.url);
        if let Some(response) = cached {
            self.spawn_refresh(request.clone());
            return Ok(CacheOutcome::Response(response));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.status == 200 {
                    self.caches
                        .lock()
                        .unwrap()
                        .put(DYNAMIC_CACHE, &request.url, response.clone());
                }
                Ok(CacheOutcome::Response(response))
            }
            Err(err) => {
                if request.kind == RequestKind::Image {
                    debug!(url = %request.url, "offline image placeholder: {err}");
                    return Ok(CacheOutcome::Response(
                        CachedResponse::offline_image_placeholder(),
                    ));
                }
                warn!(url = %request.url, "offline with no cached response: {err}");
                Err(CacheError::Offline {
                    url: request.url.to_string(),
                })
            }
        }
    }

    /// Network-first with cache, then shell, fallback.
    async fn handle_navigation(&self, request: &CacheRequest) -> Result<CacheOutcome, CacheError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.caches
                    .lock()
                    .unwrap()
                    .put(DYNAMIC_CACHE, &request.url, response.clone());
                Ok(CacheOutcome::Response(response))
            }
            Err(err) => {
                debug!(url = %request.url, "navigation fell back to cache: {err}");
                let shell_url = self
                    .origin
                    .join(&self.shell_path)
                    .map_err(|e| CacheError::InvalidUrl(e.to_string()))?;
                let caches = self.caches.lock().unwrap();
                if let Some(cached) = caches.lookup(&request.url) {
                    return Ok(CacheOutcome::Response(cached));
                }
                if let Some(shell) = caches.lookup(&shell_url) {
                    return Ok(CacheOutcome::Response(shell));
                }
                Err(CacheError::Offline {
                    url: request.url.to_string(),
                })
            }
        }
    }

    fn same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }

    fn is_bypassed(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.bypass_hosts.iter().any(|h| host.contains(h.as_str())),
            None => false,
        }
    }

    /// Refresh a cached entry without blocking the response.
    fn spawn_refresh(&self, request: CacheRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let caches = Arc::clone(&self.caches);
        tokio::spawn(async move {
            match fetcher.fetch(&request).await {
                Ok(response) => {
                    caches
                        .lock()
                        .unwrap()
                        .put(DYNAMIC_CACHE, &request.url, response);
                }
                Err(err) => {
                    debug!(url = %request.url, "background refresh failed: {err}");
                }
            }
        });
    }
}

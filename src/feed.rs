use crate::cache::ResponseCache;
use crate::config::{Config, USER_AGENT};
use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared HTTP client for every source; requests are not retried.
pub fn http_client(config: &Config) -> SourceResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SourceError::Client(e.to_string()))
}

/// Non-2xx responses are failures just like transport errors.
pub fn check_status(response: reqwest::Response, api: &str) -> SourceResult<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::status(status.as_u16(), format!("{} API error", api)));
    }
    Ok(response)
}

/// One upstream API normalized into a list of `T`.
#[async_trait]
pub trait Source<T>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self) -> SourceResult<Vec<T>>;

    /// Static data served whenever `fetch` fails or the source is disabled.
    fn fallback(&self) -> Vec<T>;
}

/// A source fronted by its response cache. `load` never fails.
///
/// Concurrent misses are serialized so one window costs at most one upstream call.
pub struct Feed<T> {
    source: Arc<dyn Source<T>>,
    cache: Arc<ResponseCache<Vec<T>>>,
    refresh: Mutex<()>,
}

impl<T: Clone + Send + Sync + 'static> Feed<T> {
    pub fn new(source: Arc<dyn Source<T>>, cache: Arc<ResponseCache<Vec<T>>>) -> Self {
        Self {
            source,
            cache,
            refresh: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn load(&self) -> Vec<T> {
        let name = self.source.name();
        if let Some(hit) = self.cache.get().await {
            tracing::debug!(source = name, count = hit.len(), "Serving cached response");
            return hit;
        }

        let _refresh = self.refresh.lock().await;
        // another caller may have filled the cache while we waited
        if let Some(hit) = self.cache.get().await {
            tracing::debug!(source = name, count = hit.len(), "Serving response fetched by a concurrent caller");
            return hit;
        }

        match self.source.fetch().await {
            Ok(items) => {
                tracing::info!(source = name, count = items.len(), "Fetched");
                self.cache.put(items.clone()).await;
                items
            }
            Err(e) if e.is_soft_disable() => {
                tracing::warn!(source = name, reason = %e, "Source disabled, using fallback data");
                self.source.fallback()
            }
            Err(e) => {
                tracing::warn!(source = name, error = %e, "Fetch failed, using fallback data");
                self.source.fallback()
            }
        }
    }

    /// Drops the cached response so the next `load` goes upstream.
    pub async fn invalidate(&self) {
        self.cache.clear().await;
    }

    /// Goes upstream once, bypassing both cache and fallback.
    pub async fn probe(&self) -> SourceResult<Vec<T>> {
        self.source.fetch().await
    }
}

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

struct CacheEntry<T> {
    data: T,
    cached_at: Instant,
}

/// Single-slot response cache with a fixed freshness window.
///
/// Owned by whoever injects it; a zero TTL turns every lookup into a miss.
pub struct ResponseCache<T> {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Returns the cached value if it is younger than the TTL.
    pub async fn get(&self) -> Option<T> {
        if self.ttl.is_zero() {
            return None;
        }
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.data.clone())
    }

    pub async fn put(&self, data: T) {
        if self.ttl.is_zero() {
            return;
        }
        *self.entry.write().await = Some(CacheEntry {
            data,
            cached_at: Instant::now(),
        });
    }

    pub async fn clear(&self) {
        *self.entry.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.put(vec![1, 2, 3]).await;
        assert_eq!(cache.get().await, Some(vec![1, 2, 3]));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get().await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_never_stores() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.put("fresh").await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn clear_drops_entry() {
        let cache = ResponseCache::new(Duration::from_secs(300));
        cache.put(7u32).await;
        cache.clear().await;
        assert!(cache.get().await.is_none());
    }
}

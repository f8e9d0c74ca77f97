//! Single-slot snapshot cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// The serialized payload and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub stored_at: Instant,
    pub body: Arc<str>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// One slot, overwritten on every refresh. There is no eviction.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached body, if one was stored less than `ttl` before `now`.
    pub async fn get_fresh(&self, now: Instant, ttl: Duration) -> Option<Arc<str>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| Arc::clone(&entry.body))
    }

    pub async fn store(&self, now: Instant, body: Arc<str>) {
        *self.slot.write().await = Some(CacheEntry { stored_at: now, body });
    }

    pub async fn stored_at(&self) -> Option<Instant> {
        self.slot.read().await.as_ref().map(|entry| entry.stored_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = SnapshotCache::new();
        assert!(cache.get_fresh(Instant::now(), Duration::from_secs(30)).await.is_none());
        assert!(cache.stored_at().await.is_none());
    }

    #[tokio::test]
    async fn test_fresh_until_ttl() {
        let cache = SnapshotCache::new();
        let t0 = Instant::now();
        let ttl = Duration::from_secs(30);
        cache.store(t0, Arc::from("{}")).await;

        assert_eq!(cache.get_fresh(t0 + Duration::from_secs(29), ttl).await.as_deref(), Some("{}"));
        assert!(cache.get_fresh(t0 + ttl, ttl).await.is_none());
    }

    #[tokio::test]
    async fn test_store_overwrites_slot() {
        let cache = SnapshotCache::new();
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(5);
        cache.store(t0, Arc::from("old")).await;
        cache.store(t1, Arc::from("new")).await;

        assert_eq!(cache.stored_at().await, Some(t1));
        assert_eq!(cache.get_fresh(t1, Duration::from_secs(30)).await.as_deref(), Some("new"));
    }
}

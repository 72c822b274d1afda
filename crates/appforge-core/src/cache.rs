//! Result cache using moka
//!
//! Finished results are cached by a caller-supplied (or content-derived) key.
//! The orchestrator reads before running stages and writes once after a
//! successful run.

use crate::config::CacheConfig;
use crate::types::GenerationResult;
use moka::future::Cache;
use moka::Expiry;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Keyed store for finished results
#[async_trait::async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a result
    async fn get(&self, key: &str) -> Option<GenerationResult>;

    /// Store a result for `ttl`
    async fn set(&self, key: &str, result: GenerationResult, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: Arc<GenerationResult>,
    ttl: Duration,
}

/// Per-entry expiry taken from the TTL given to `set`
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &CacheEntry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded, TTL-aware in-memory result cache
#[derive(Clone)]
pub struct MokaResultCache {
    inner: Cache<String, CacheEntry>,
}

impl std::fmt::Debug for MokaResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaResultCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

impl MokaResultCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(EntryExpiry)
                .build(),
        }
    }

    /// Create cache from configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity)
    }

    /// Invalidate cache entry
    #[inline]
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Invalidate all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get approximate entry count
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Flush pending maintenance so counts are exact
    #[inline]
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for MokaResultCache {
    /// Create cache with the default configuration
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

#[async_trait::async_trait]
impl ResultCache for MokaResultCache {
    async fn get(&self, key: &str) -> Option<GenerationResult> {
        self.inner
            .get(key)
            .await
            .map(|entry| GenerationResult::clone(&entry.result))
    }

    async fn set(&self, key: &str, result: GenerationResult, ttl: Duration) {
        let entry = CacheEntry {
            result: Arc::new(result),
            ttl,
        };
        self.inner.insert(key.to_string(), entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;

    fn result(error: &str) -> GenerationResult {
        GenerationResult::failure(RequestId::new(), error, Vec::new(), Vec::new())
    }

    #[tokio::test]
    async fn cache_set_and_get() {
        let cache = MokaResultCache::new(10);
        cache.set("k", result("one"), Duration::from_secs(60)).await;

        let hit = cache.get("k").await.unwrap();
        assert_eq!(hit.error.as_deref(), Some("one"));
        assert!(cache.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn cache_overwrites() {
        let cache = MokaResultCache::new(10);
        cache.set("k", result("one"), Duration::from_secs(60)).await;
        cache.set("k", result("two"), Duration::from_secs(60)).await;

        assert_eq!(cache.get("k").await.unwrap().error.as_deref(), Some("two"));
        cache.sync().await;
        assert_eq!(cache.entry_count(), 1);
    }

    #[tokio::test]
    async fn cache_entry_expires() {
        let cache = MokaResultCache::new(10);
        cache.set("k", result("short"), Duration::from_millis(20)).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn overwrite_takes_new_ttl() {
        let cache = MokaResultCache::new(10);
        cache.set("k", result("short"), Duration::from_millis(20)).await;
        cache.set("k", result("long"), Duration::from_secs(60)).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(cache.get("k").await.unwrap().error.as_deref(), Some("long"));
    }

    #[tokio::test]
    async fn cache_invalidation() {
        let cache = MokaResultCache::default();
        cache.set("k", result("x"), Duration::from_secs(60)).await;
        cache.invalidate("k").await;
        assert!(cache.get("k").await.is_none());
    }
}

//! Result cache for serialized order books.

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Key-value store for rendered responses. Implementations swallow their own
/// failures; a broken cache only costs recomputation.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

#[derive(Clone)]
struct CachedEntry {
    payload: Arc<str>,
    ttl: Duration,
}

/// Each entry lives for the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, CachedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache bounded by entry count.
#[derive(Clone)]
pub struct MemoryCache {
    inner: Cache<String, CachedEntry>,
}

impl MemoryCache {
    pub fn new(capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let hit = self.inner.get(key).await;
        debug!(key, hit = hit.is_some(), "[CACHE] lookup");
        hit.map(|entry| entry.payload.to_string())
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        debug!(key, ttl_secs = ttl.as_secs(), "[CACHE] store");
        let entry = CachedEntry {
            payload: Arc::from(value),
            ttl,
        };
        self.inner.insert(key.to_string(), entry).await;
    }
}

//! Query cache keyed by collection.
//!
//! Holds the latest live or fallback result per collection with no TTL.
//! Entries leave the cache only through explicit invalidation. The lock is
//! never held across a backend call, so different collections can be
//! fetched concurrently.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use portal_core::{Collection, CollectionKey, FallbackReason, Fetched, Origin};

use crate::gateway::CommandGateway;

/// Cached result of one collection read.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub collection: Arc<Collection>,
    pub origin: Origin,
    /// Set when `origin` is `Fallback`.
    pub reason: Option<FallbackReason>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn from_fetched(fetched: Fetched<Collection>) -> Self {
        let origin = fetched.origin();
        let reason = fetched.reason().cloned();
        Self {
            collection: Arc::new(fetched.into_data()),
            origin,
            reason,
            fetched_at: Utc::now(),
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    /// Fetch results dropped because their key was invalidated mid-flight.
    pub discarded: u64,
}

#[derive(Default)]
struct Slot {
    entry: Option<CacheEntry>,
    /// Bumped by every invalidation; a fetch only stores its result if the
    /// generation it started under is still current.
    generation: u64,
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<CollectionKey, Slot>,
    stats: CacheStats,
}

/// Query cache in front of the command gateway.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

struct QueryCacheInner {
    gateway: CommandGateway,
    state: Mutex<CacheState>,
}

impl QueryCache {
    pub fn new(gateway: CommandGateway) -> Self {
        Self {
            inner: Arc::new(QueryCacheInner {
                gateway,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Return the cached entry for `key`, fetching it on a miss.
    #[instrument(skip(self), fields(subsystem = "cache", component = "query_cache", op = "get", collection = %key))]
    pub async fn get(&self, key: CollectionKey) -> CacheEntry {
        let generation = {
            let mut state = self.inner.state.lock().await;
            let cached = state.slots.get(&key).and_then(|slot| slot.entry.clone());
            if let Some(entry) = cached {
                state.stats.hits += 1;
                debug!(origin = %entry.origin, "Cache HIT");
                return entry;
            }
            state.stats.misses += 1;
            debug!("Cache MISS");
            state.slots.get(&key).map(|slot| slot.generation).unwrap_or(0)
        };

        let entry = CacheEntry::from_fetched(self.inner.gateway.fetch(key).await);

        let mut state = self.inner.state.lock().await;
        let slot = state.slots.entry(key).or_default();
        if slot.generation == generation {
            slot.entry = Some(entry.clone());
        } else {
            state.stats.discarded += 1;
            debug!("Invalidated while fetching, result not stored");
        }
        entry
    }

    /// Cached entry without fetching.
    pub async fn peek(&self, key: CollectionKey) -> Option<CacheEntry> {
        let state = self.inner.state.lock().await;
        state.slots.get(&key).and_then(|slot| slot.entry.clone())
    }

    /// Drop the entry for `key`. Returns whether an entry was present.
    #[instrument(skip(self), fields(subsystem = "cache", component = "query_cache", op = "invalidate", collection = %key))]
    pub async fn invalidate(&self, key: CollectionKey) -> bool {
        let mut state = self.inner.state.lock().await;
        state.stats.invalidations += 1;
        let slot = state.slots.entry(key).or_default();
        slot.generation += 1;
        let removed = slot.entry.take().is_some();
        debug!(removed, "Cache entry invalidated");
        removed
    }

    /// Drop every entry.
    pub async fn invalidate_all(&self) {
        for key in CollectionKey::ALL {
            self.invalidate(key).await;
        }
    }

    /// Manual re-fetch: invalidate then read through.
    pub async fn refetch(&self, key: CollectionKey) -> CacheEntry {
        self.invalidate(key).await;
        self.get(key).await
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        let state = self.inner.state.lock().await;
        state.slots.values().filter(|slot| slot.entry.is_some()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.state.lock().await.stats
    }

    /// Drop all entries and reset statistics.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        for slot in state.slots.values_mut() {
            slot.generation += 1;
            slot.entry = None;
        }
        state.stats = CacheStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use portal_core::seed_collection;
    use serde_json::json;
    use std::time::Duration;

    fn cache(transport: &MockTransport) -> QueryCache {
        QueryCache::new(CommandGateway::new(Arc::new(transport.clone())))
    }

    fn live_transport() -> MockTransport {
        MockTransport::new()
            .with_response("list_switches", json!([{"id": 1, "name": "A", "ip": "10.0.0.1"}]))
            .with_response("list_tasks", json!([]))
            .with_response("get_bookmark_sections", json!([]))
    }

    #[tokio::test]
    async fn test_second_get_is_served_from_cache() {
        let transport = live_transport();
        let cache = cache(&transport);

        let first = cache.get(CollectionKey::Switches).await;
        let second = cache.get(CollectionKey::Switches).await;

        assert_eq!(first, second);
        assert_eq!(transport.call_count("list_switches"), 1);
        let stats = cache.stats().await;
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let transport = live_transport();
        let cache = cache(&transport);

        cache.get(CollectionKey::Switches).await;
        assert!(cache.invalidate(CollectionKey::Switches).await);
        cache.get(CollectionKey::Switches).await;

        assert_eq!(transport.call_count("list_switches"), 2);
    }

    #[tokio::test]
    async fn test_invalidate_missing_entry() {
        let cache = cache(&live_transport());
        assert!(!cache.invalidate(CollectionKey::Tasks).await);
    }

    #[tokio::test]
    async fn test_invalidate_touches_only_its_key() {
        let transport = live_transport();
        let cache = cache(&transport);

        cache.get(CollectionKey::Switches).await;
        cache.get(CollectionKey::Tasks).await;
        cache.invalidate(CollectionKey::Tasks).await;

        assert!(cache.peek(CollectionKey::Switches).await.is_some());
        assert!(cache.peek(CollectionKey::Tasks).await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fallback_results_are_cached() {
        let transport = MockTransport::new();
        let cache = cache(&transport);

        let entry = cache.get(CollectionKey::Switches).await;
        assert_eq!(entry.origin, Origin::Fallback);
        assert!(entry.reason.is_some());
        assert_eq!(*entry.collection, seed_collection(CollectionKey::Switches));

        cache.get(CollectionKey::Switches).await;
        assert_eq!(transport.call_count("list_switches"), 1);
    }

    #[tokio::test]
    async fn test_refetch_overwrites_entry() {
        let transport = MockTransport::new();
        let cache = cache(&transport);

        let first = cache.get(CollectionKey::Switches).await;
        assert_eq!(first.origin, Origin::Fallback);

        transport.set_response("list_switches", json!([]));
        let second = cache.refetch(CollectionKey::Switches).await;
        assert_eq!(second.origin, Origin::Live);
        assert_eq!(cache.peek(CollectionKey::Switches).await, Some(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidation_during_fetch_wins() {
        let transport = live_transport().with_latency_ms(100);
        let cache = cache(&transport);

        let reader = cache.clone();
        let fetch = tokio::spawn(async move { reader.get(CollectionKey::Tasks).await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate(CollectionKey::Tasks).await;

        let entry = fetch.await.unwrap();
        assert_eq!(entry.origin, Origin::Live);
        assert!(cache.peek(CollectionKey::Tasks).await.is_none());
        assert_eq!(cache.stats().await.discarded, 1);
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let transport = live_transport();
        let cache = cache(&transport);

        cache.get(CollectionKey::Switches).await;
        cache.get(CollectionKey::Bookmarks).await;
        cache.clear().await;

        assert!(cache.is_empty().await);
        assert_eq!(cache.stats().await, CacheStats::default());
    }
}

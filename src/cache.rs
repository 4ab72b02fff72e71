//! Bounded least-recently-used caches for the assistant.
//!
//! The assistant memoizes query→SQL and query→answer lookups. Both caches are
//! owned by the assistant rather than living in process-wide state, so their
//! capacity is injectable and a stale entry can be dropped on demand.

use std::hash::Hash;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

/// A fixed-capacity map that discards the least recently used entry when full.
///
/// Backed by a moka cache running its LRU eviction policy rather than the
/// default TinyLFU, so a full cache always admits the new entry and evicts the
/// entry read or written longest ago. Maintenance runs after every write,
/// which keeps `len` exact.
pub struct LruCache<K, V> {
    inner: Option<Cache<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero disables caching: inserts are dropped.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Self::build(capacity),
            capacity,
        }
    }

    fn build(capacity: usize) -> Option<Cache<K, V>> {
        (capacity > 0).then(|| {
            Cache::builder()
                .max_capacity(capacity as u64)
                .eviction_policy(EvictionPolicy::lru())
                .build()
        })
    }

    /// Returns a copy of the value for `key`, marking it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.as_ref()?.get(key)
    }

    /// Stores `value` under `key`, evicting the least recently used entry
    /// if the cache is over capacity.
    pub fn insert(&self, key: K, value: V) {
        if let Some(cache) = &self.inner {
            cache.insert(key, value);
            cache.run_pending_tasks();
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.inner = Self::build(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.inner
            .as_ref()
            .map_or(0, |cache| cache.entry_count() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

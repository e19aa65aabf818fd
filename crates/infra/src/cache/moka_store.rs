use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::{CacheEntryOptions, CacheStore};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    options: CacheEntryOptions,
}

/// Derives each entry's deadline from its own [`CacheEntryOptions`].
struct EntryExpiry;

impl<K, V> Expiry<K, Entry<V>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &K,
        entry: &Entry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.options.remaining(Duration::ZERO)
    }

    fn expire_after_read(
        &self,
        _key: &K,
        entry: &Entry<V>,
        read_at: Instant,
        duration_until_expiry: Option<Duration>,
        last_modified_at: Instant,
    ) -> Option<Duration> {
        if entry.options.sliding_expiration.is_none() {
            return duration_until_expiry;
        }
        entry
            .options
            .remaining(read_at.saturating_duration_since(last_modified_at))
    }

    fn expire_after_update(
        &self,
        _key: &K,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        entry.options.remaining(Duration::ZERO)
    }
}

/// Process-local cache backed by `moka`.
///
/// Unbounded: entries leave only through expiration or replacement.
pub struct MokaCache<K, V> {
    inner: Cache<K, Entry<V>>,
}

impl<K, V> MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().expire_after(EntryExpiry).build(),
        }
    }
}

impl<K, V> Default for MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CacheStore<K, V> for MokaCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value)
    }

    fn set(&self, key: K, value: V, options: CacheEntryOptions) {
        self.inner.insert(key, Entry { value, options });
    }
}

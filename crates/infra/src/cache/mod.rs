//! In-process key/value cache with expiration options.
//!
//! The API layer receives a `CacheStore` at construction time and never
//! touches a global; tests swap in spies or a cache driven by a manual clock.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

mod moka_store;

pub use moka_store::MokaCache;

/// Per-entry expiration. With neither window set the entry lives until replaced.
///
/// Entries are never evicted for size: the store is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheEntryOptions {
    /// Entry expires after this long without being read or written.
    pub sliding_expiration: Option<Duration>,
    /// Entry expires this long after it was written, regardless of reads.
    pub absolute_expiration_relative_to_now: Option<Duration>,
}

impl CacheEntryOptions {
    pub fn sliding(window: Duration) -> Self {
        Self {
            sliding_expiration: Some(window),
            ..Self::default()
        }
    }

    pub fn with_absolute_expiration(mut self, ttl: Duration) -> Self {
        self.absolute_expiration_relative_to_now = Some(ttl);
        self
    }

    /// Time left before expiry for an entry written `age` ago and read just now.
    pub(crate) fn remaining(&self, age: Duration) -> Option<Duration> {
        let absolute = self
            .absolute_expiration_relative_to_now
            .map(|ttl| ttl.saturating_sub(age));
        match (self.sliding_expiration, absolute) {
            (Some(window), Some(left)) => Some(window.min(left)),
            (window, left) => window.or(left),
        }
    }
}

/// Shared key/value cache abstraction.
pub trait CacheStore<K, V>: Send + Sync {
    /// Returns the live value for `key`, refreshing its sliding window.
    fn get(&self, key: &K) -> Option<V>;
    fn set(&self, key: K, value: V, options: CacheEntryOptions);
}

impl<K, V, S> CacheStore<K, V> for Arc<S>
where
    S: CacheStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn set(&self, key: K, value: V, options: CacheEntryOptions) {
        (**self).set(key, value, options)
    }
}

/// Read-through lookup: return the cached value, or compute it with `fetch`,
/// store it under `options`, and return it.
///
/// Not atomic: concurrent misses may each call `fetch`; the last `set` wins.
/// Errors from `fetch` are returned as-is and nothing is cached.
pub async fn read_through<K, V, C, F, Fut, E>(
    cache: &C,
    key: K,
    options: CacheEntryOptions,
    fetch: F,
) -> Result<V, E>
where
    K: core::fmt::Debug,
    V: Clone,
    C: CacheStore<K, V> + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(hit) = cache.get(&key) {
        tracing::debug!(?key, "cache hit");
        return Ok(hit);
    }

    tracing::debug!(?key, "cache miss");
    let value = fetch().await?;
    cache.set(key, value.clone(), options);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn read_through_populates_once() {
        let cache: MokaCache<&'static str, u32> = MokaCache::new();
        let calls = AtomicUsize::new(0);
        let opts = CacheEntryOptions::sliding(Duration::from_secs(60));

        for _ in 0..3 {
            let v = read_through(&cache, "k", opts, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(7)
            })
            .await
            .unwrap();
            assert_eq!(v, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_errors_are_not_cached() {
        let cache: MokaCache<&'static str, u32> = MokaCache::new();
        let opts = CacheEntryOptions::default();

        let err = read_through(&cache, "k", opts, || async { Err::<u32, _>("down") }).await;
        assert_eq!(err, Err("down"));
        assert_eq!(cache.get(&"k"), None);

        let ok = read_through(&cache, "k", opts, || async { Ok::<_, &str>(1) }).await;
        assert_eq!(ok, Ok(1));
    }

    #[test]
    fn remaining_takes_the_earlier_deadline() {
        let mins = |m: u64| Duration::from_secs(m * 60);
        let both = CacheEntryOptions::sliding(mins(30)).with_absolute_expiration(mins(45));

        assert_eq!(both.remaining(Duration::ZERO), Some(mins(30)));
        assert_eq!(both.remaining(mins(20)), Some(mins(25)));
        assert_eq!(both.remaining(mins(50)), Some(Duration::ZERO));
        assert_eq!(CacheEntryOptions::sliding(mins(5)).remaining(mins(99)), Some(mins(5)));
        assert_eq!(CacheEntryOptions::default().remaining(mins(1)), None);
    }
}

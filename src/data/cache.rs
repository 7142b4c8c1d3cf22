//! Snapshot cache with an optional time-to-live.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: Arc<V>,
    stored_at: Instant,
}

/// Keyed cache handing out shared, immutable snapshots.
///
/// Entries expire after `ttl` (never, when `None`) and can be dropped
/// explicitly with [`invalidate`](Self::invalidate) or [`clear`](Self::clear).
/// The lock is not held while a missing value is being loaded, so two
/// different keys can load concurrently.
pub struct TtlCache<K, V> {
    ttl: Option<Duration>,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        self.ttl.map_or(true, |ttl| entry.stored_at.elapsed() < ttl)
    }

    /// Cached value for `key`, unless missing or expired.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.lock();
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Return the cached value or store the result of `load`.
    ///
    /// Errors from `load` are returned as-is and nothing is cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let value = Arc::new(load()?);
        self.lock().insert(
            key,
            CacheEntry {
                value: Arc::clone(&value),
                stored_at: Instant::now(),
            },
        );
        Ok(value)
    }

    pub fn invalidate(&self, key: &K) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn second_lookup_hits_cache() {
        let cache: TtlCache<&str, u32> = TtlCache::new(None);
        let loads = Cell::new(0);

        let load = || {
            loads.set(loads.get() + 1);
            Ok::<_, ()>(7)
        };
        let first = cache.get_or_try_insert_with("cases", load).unwrap();
        let second = cache
            .get_or_try_insert_with("cases", || Ok::<_, ()>(99))
            .unwrap();

        assert_eq!(loads.get(), 1);
        assert_eq!(*second, 7);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache: TtlCache<&str, u32> = TtlCache::new(None);

        let err = cache.get_or_try_insert_with("cases", || Err("offline"));
        assert_eq!(err.unwrap_err(), "offline");
        assert!(cache.is_empty());

        let value = cache
            .get_or_try_insert_with("cases", || Ok::<_, &str>(3))
            .unwrap();
        assert_eq!(*value, 3);
    }

    #[test]
    fn expired_entries_are_reloaded() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Some(Duration::ZERO));
        cache
            .get_or_try_insert_with("cases", || Ok::<_, ()>(1))
            .unwrap();

        assert!(cache.get(&"cases").is_none());
        let value = cache
            .get_or_try_insert_with("cases", || Ok::<_, ()>(2))
            .unwrap();
        assert_eq!(*value, 2);
    }

    #[test]
    fn invalidate_drops_one_key() {
        let cache: TtlCache<&str, u32> = TtlCache::new(None);
        cache.get_or_try_insert_with("cases", || Ok::<_, ()>(1)).unwrap();
        cache.get_or_try_insert_with("deaths", || Ok::<_, ()>(2)).unwrap();

        cache.invalidate(&"cases");
        assert!(cache.get(&"cases").is_none());
        assert_eq!(cache.get(&"deaths").as_deref(), Some(&2));

        cache.clear();
        assert!(cache.is_empty());
    }
}

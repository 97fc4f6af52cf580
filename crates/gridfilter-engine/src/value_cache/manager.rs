//! Shared table of column value caches.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use gridfilter_model::models::CellValue;
use parking_lot::Mutex;

use super::{CacheOptions, CacheUpdate, ColumnValueCache};

/// Hands out shared column value caches keyed by a caller-chosen string.
///
/// The table only holds weak handles: once every `Arc` a caller received has
/// been dropped, the entry is dead and the next lookup rebuilds it from the
/// provider. A single lock guards the table and is held while the provider
/// runs, so two callers never build the same cache at once.
#[derive(Debug, Default)]
pub struct ValueCacheManager {
    entries: Mutex<HashMap<String, Weak<ColumnValueCache>>>,
    options: CacheOptions,
}

impl ValueCacheManager {
    /// Creates a manager whose caches use default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager whose caches use `options`.
    pub fn with_options(options: CacheOptions) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            options,
        }
    }

    /// Returns the live cache for `key`, building it with `provider` on a miss.
    pub fn get_or_create<F>(&self, key: &str, provider: F) -> Arc<ColumnValueCache>
    where
        F: FnOnce() -> Vec<CellValue>,
    {
        let mut entries = self.entries.lock();
        if let Some(cache) = entries.get(key).and_then(Weak::upgrade) {
            tracing::debug!(key = %key, "value cache hit");
            return cache;
        }

        let cache = Arc::new(ColumnValueCache::with_options(provider(), self.options));
        tracing::debug!(key = %key, distinct = cache.len(), "value cache built");
        entries.insert(key.to_string(), Arc::downgrade(&cache));
        cache
    }

    /// Returns the live cache for `key` without building one.
    pub fn get(&self, key: &str) -> Option<Arc<ColumnValueCache>> {
        self.entries.lock().get(key).and_then(Weak::upgrade)
    }

    /// Applies an incremental update to the cache stored under `key`.
    ///
    /// `Updated` replaces the entry and returns the new cache. `Unchanged`
    /// returns the current one. `NeedsFullRebuild` drops the entry and
    /// returns `None`, so the next [`get_or_create`](Self::get_or_create)
    /// rebuilds from the provider.
    pub fn apply_update(&self, key: &str, update: CacheUpdate) -> Option<Arc<ColumnValueCache>> {
        let mut entries = self.entries.lock();
        match update {
            CacheUpdate::Updated(cache) => {
                let cache = Arc::new(cache);
                entries.insert(key.to_string(), Arc::downgrade(&cache));
                Some(cache)
            }
            CacheUpdate::Unchanged => entries.get(key).and_then(Weak::upgrade),
            CacheUpdate::NeedsFullRebuild => {
                tracing::debug!(key = %key, "value cache dropped for rebuild");
                entries.remove(key);
                None
            }
        }
    }

    /// Drops the entry for `key`. Returns true if one existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Removes entries whose caches have been dropped; returns how many.
    pub fn purge_dead(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, cache| cache.strong_count() > 0);
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "purged dead value caches");
        }
        purged
    }

    /// Number of entries, live or dead.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn provider(calls: &Cell<usize>) -> impl FnOnce() -> Vec<CellValue> + '_ {
        move || {
            calls.set(calls.get() + 1);
            vec![CellValue::text("a"), CellValue::text("b")]
        }
    }

    #[test]
    fn test_hit_reuses_live_cache() {
        let manager = ValueCacheManager::new();
        let calls = Cell::new(0);

        let first = manager.get_or_create("name", provider(&calls));
        let second = manager.get_or_create("name", provider(&calls));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_dropped_cache_is_a_miss() {
        let manager = ValueCacheManager::new();
        let calls = Cell::new(0);

        drop(manager.get_or_create("name", provider(&calls)));
        assert!(manager.get("name").is_none());

        let rebuilt = manager.get_or_create("name", provider(&calls));
        assert_eq!(calls.get(), 2);
        assert_eq!(rebuilt.len(), 2);
    }

    #[test]
    fn test_apply_update_replaces_entry() {
        let manager = ValueCacheManager::new();
        let cache = manager.get_or_create("col", || vec![CellValue::text("a")]);

        let update = cache.add_values(vec![CellValue::text("z")]);
        let updated = manager.apply_update("col", update).unwrap();
        assert_eq!(updated.len(), 2);

        let fetched = manager.get("col").unwrap();
        assert!(Arc::ptr_eq(&updated, &fetched));
    }

    #[test]
    fn test_apply_rebuild_drops_entry() {
        let manager = ValueCacheManager::new();
        let _cache = manager.get_or_create("col", || vec![CellValue::text("a")]);

        assert!(manager
            .apply_update("col", CacheUpdate::NeedsFullRebuild)
            .is_none());
        assert!(manager.get("col").is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_apply_unchanged_returns_current() {
        let manager = ValueCacheManager::new();
        let cache = manager.get_or_create("col", || vec![CellValue::text("a")]);
        let same = manager.apply_update("col", CacheUpdate::Unchanged).unwrap();
        assert!(Arc::ptr_eq(&cache, &same));
    }

    #[test]
    fn test_purge_dead_and_invalidate() {
        let manager = ValueCacheManager::new();
        let keep = manager.get_or_create("keep", Vec::new);
        drop(manager.get_or_create("gone", Vec::new));

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.purge_dead(), 1);
        assert_eq!(manager.len(), 1);

        assert!(manager.invalidate("keep"));
        assert!(!manager.invalidate("keep"));
        drop(keep);
    }

    #[test]
    fn test_options_flow_into_caches() {
        let manager = ValueCacheManager::with_options(CacheOptions { sort_ceiling: 1 });
        let cache = manager.get_or_create("col", || {
            vec![CellValue::text("b"), CellValue::text("a")]
        });
        assert!(!cache.is_sorted());
    }

    #[test]
    fn test_manager_is_shareable_across_threads() {
        let manager = Arc::new(ValueCacheManager::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    manager
                        .get_or_create("shared", || vec![CellValue::Number(1.0)])
                        .len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}

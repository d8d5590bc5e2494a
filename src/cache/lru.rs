//! LRU Store Module
//!
//! Evicts the entry whose last save or hit is the oldest.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{
    needs_eviction, Cache, CacheEntry, CacheStats, Capacity, EntityId, LruMeta,
};
use crate::error::Result;

// == LRU State ==
/// Everything guarded by the store's lock.
#[derive(Debug)]
struct LruState<V> {
    /// Resident values with their last-touched tick
    entries: HashMap<EntityId, CacheEntry<V, LruMeta>>,
    /// Maximum number of resident entries
    capacity: Capacity,
    /// Logical clock, bumped on every touch
    clock: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> LruState<V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Removes the least recently touched entry. Equal ticks fall back to the
    /// lowest key.
    fn evict_oldest(&mut self) -> Option<EntityId> {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(key, entry)| (entry.meta.last_touched, **key))
            .map(|(key, _)| *key)?;

        self.entries.remove(&victim);
        self.stats.record_eviction();
        info!(key = victim, "Evicted least recently used entry");
        Some(victim)
    }
}

// == LRU Store ==
/// Fixed-capacity cache with least-recently-used eviction.
#[derive(Debug)]
pub struct LruStore<V> {
    state: Mutex<LruState<V>>,
}

impl<V> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store, rejecting non-positive capacities.
    pub fn new(capacity: i64) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::new(capacity)?))
    }

    /// Creates an empty store from an already validated capacity.
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            state: Mutex::new(LruState {
                entries: HashMap::new(),
                capacity,
                clock: 0,
                stats: CacheStats::new(),
            }),
        }
    }

    // == Last Touched ==
    /// Returns the logical tick of the key's last access, if resident.
    pub fn last_touched(&self, key: EntityId) -> Option<u64> {
        self.state
            .lock()
            .entries
            .get(&key)
            .map(|entry| entry.meta.last_touched)
    }
}

impl<V> Cache<V> for LruStore<V>
where
    V: Clone + Send,
{
    fn set_capacity(&self, capacity: i64) -> Result<()> {
        let capacity = Capacity::new(capacity)?;
        self.state.lock().capacity = capacity;
        info!(%capacity, "LRU capacity updated");
        Ok(())
    }

    fn save(&self, key: Option<EntityId>, value: V) -> V {
        let Some(key) = key else {
            debug!("No id to cache under, returning value as is");
            return value;
        };

        let mut state = self.state.lock();
        // Loops only after the capacity was lowered below the current size
        while needs_eviction(state.entries.len(), state.capacity) {
            if state.evict_oldest().is_none() {
                break;
            }
        }

        let last_touched = state.tick();
        state
            .entries
            .insert(key, CacheEntry::new(value.clone(), LruMeta { last_touched }));
        debug!(key, "Saved object to cache");

        value
    }

    fn get_by_id(&self, key: EntityId) -> Option<V> {
        let mut state = self.state.lock();
        if !state.entries.contains_key(&key) {
            state.stats.record_miss();
            debug!(key, "Cache miss");
            return None;
        }

        let last_touched = state.tick();
        let entry = state.entries.get_mut(&key)?;
        entry.meta.last_touched = last_touched;
        let value = entry.value.clone();

        state.stats.record_hit();
        debug!(key, "Got object from cache");
        Some(value)
    }

    fn delete(&self, key: EntityId) {
        if self.state.lock().entries.remove(&key).is_some() {
            debug!(key, "Deleted object from cache");
        }
    }

    fn contains(&self, key: EntityId) -> bool {
        self.state.lock().entries.contains_key(&key)
    }

    fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    fn capacity(&self) -> Capacity {
        self.state.lock().capacity
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state
            .stats
            .snapshot(state.entries.len(), state.capacity.get())
    }

    fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn store(capacity: i64) -> LruStore<&'static str> {
        LruStore::new(capacity).unwrap()
    }

    #[test]
    fn test_lru_new() {
        let store = store(10);
        assert!(store.is_empty());
        assert_eq!(store.capacity().get(), 10);
    }

    #[test]
    fn test_lru_rejects_zero_capacity() {
        let result = LruStore::<&str>::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(_))));
    }

    #[test]
    fn test_lru_save_and_get() {
        let store = store(10);

        assert_eq!(store.save(Some(1), "a"), "a");
        assert_eq!(store.get_by_id(1), Some("a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lru_save_without_key_passes_through() {
        let store = store(1);
        store.save(Some(1), "a");

        assert_eq!(store.save(None, "b"), "b");
        // Nothing inserted and nothing evicted
        assert_eq!(store.len(), 1);
        assert!(store.contains(1));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_lru_evicts_least_recently_touched() {
        let store = store(2);

        store.save(Some(1), "a");
        store.save(Some(2), "b");
        store.get_by_id(1);
        store.save(Some(3), "c");

        assert!(store.contains(1));
        assert!(!store.contains(2));
        assert!(store.contains(3));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_lru_evicts_oldest_without_reads() {
        let store = store(3);

        store.save(Some(10), "a");
        store.save(Some(20), "b");
        store.save(Some(30), "c");
        store.save(Some(40), "d");

        assert_eq!(store.len(), 3);
        assert!(!store.contains(10));
    }

    #[test]
    fn test_lru_save_refreshes_timestamp() {
        let store = store(3);

        store.save(Some(1), "a");
        store.save(Some(2), "b");
        let before = store.last_touched(1).unwrap();
        store.save(Some(1), "a2");
        assert!(store.last_touched(1).unwrap() > before);
    }

    #[test]
    fn test_lru_refresh_does_not_grow() {
        let store = store(5);

        store.save(Some(1), "a");
        store.save(Some(1), "b");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_id(1), Some("b"));
    }

    #[test]
    fn test_lru_refresh_at_capacity_still_evicts() {
        let store = store(2);

        store.save(Some(1), "a");
        store.save(Some(2), "b");
        // Full store: the check runs before the overwrite and drops key 1
        store.save(Some(2), "b2");

        assert_eq!(store.len(), 1);
        assert!(!store.contains(1));
        assert_eq!(store.get_by_id(2), Some("b2"));
    }

    #[test]
    fn test_lru_miss_changes_nothing() {
        let store = store(2);

        assert_eq!(store.get_by_id(99), None);
        assert!(store.is_empty());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_lru_delete_is_idempotent() {
        let store = store(2);
        store.save(Some(1), "a");

        store.delete(1);
        store.delete(1);
        store.delete(42);

        assert!(store.is_empty());
        assert_eq!(store.last_touched(1), None);
    }

    #[test]
    fn test_lru_set_capacity_applies_on_next_save() {
        let store = store(3);
        store.save(Some(1), "a");
        store.save(Some(2), "b");
        store.save(Some(3), "c");

        store.set_capacity(1).unwrap();
        // Shrinking alone evicts nothing
        assert_eq!(store.len(), 3);

        store.save(Some(4), "d");
        assert_eq!(store.len(), 1);
        assert!(store.contains(4));
    }

    #[test]
    fn test_lru_set_capacity_rejects_negative() {
        let store = store(3);

        assert!(store.set_capacity(-1).is_err());
        assert_eq!(store.capacity().get(), 3);
    }

    #[test]
    fn test_lru_clear() {
        let store = store(3);
        store.save(Some(1), "a");
        store.save(Some(2), "b");

        store.clear();
        assert!(store.is_empty());
    }
}

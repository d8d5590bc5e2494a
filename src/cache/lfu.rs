//! LFU Store Module
//!
//! Evicts the entry with the fewest saves and hits. Among entries sharing the
//! lowest count, the one inserted last goes first.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::cache::{
    needs_eviction, Cache, CacheEntry, CacheStats, Capacity, EntityId, LfuMeta,
};
use crate::error::Result;

// == LFU State ==
#[derive(Debug)]
struct LfuState<V> {
    /// Resident values with their access counters
    entries: HashMap<EntityId, CacheEntry<V, LfuMeta>>,
    /// Maximum number of resident entries
    capacity: Capacity,
    /// Next insertion sequence number
    next_seq: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl<V> LfuState<V> {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Picks the victim: lowest access count, ties resolved in favour of the
    /// most recently inserted key.
    fn select_victim(&self) -> Option<EntityId> {
        let min_count = self
            .entries
            .values()
            .map(|entry| entry.meta.access_count)
            .min()
            .unwrap_or(0);

        // Counts start at 1, so zero only shows up for an empty store
        if min_count == 0 {
            return None;
        }

        self.entries
            .iter()
            .filter(|(_, entry)| entry.meta.access_count == min_count)
            .max_by_key(|(_, entry)| entry.meta.inserted_seq)
            .map(|(key, _)| *key)
    }

    fn evict_least_frequent(&mut self) -> Option<EntityId> {
        let victim = self.select_victim()?;
        let evicted = self.entries.remove(&victim)?;

        self.stats.record_eviction();
        info!(
            key = victim,
            access_count = evicted.meta.access_count,
            "Evicted least frequently used entry"
        );
        Some(victim)
    }
}

// == LFU Store ==
/// Fixed-capacity cache with least-frequently-used eviction.
#[derive(Debug)]
pub struct LfuStore<V> {
    state: Mutex<LfuState<V>>,
}

impl<V> LfuStore<V> {
    // == Constructor ==
    /// Creates an empty store, rejecting non-positive capacities.
    pub fn new(capacity: i64) -> Result<Self> {
        Ok(Self::with_capacity(Capacity::new(capacity)?))
    }

    /// Creates an empty store from an already validated capacity.
    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            state: Mutex::new(LfuState {
                entries: HashMap::new(),
                capacity,
                next_seq: 0,
                stats: CacheStats::new(),
            }),
        }
    }

    // == Access Count ==
    /// Returns how often the key was saved or hit since it became resident.
    pub fn access_count(&self, key: EntityId) -> Option<u64> {
        self.state
            .lock()
            .entries
            .get(&key)
            .map(|entry| entry.meta.access_count)
    }
}

impl<V> Cache<V> for LfuStore<V>
where
    V: Clone + Send,
{
    fn set_capacity(&self, capacity: i64) -> Result<()> {
        let capacity = Capacity::new(capacity)?;
        self.state.lock().capacity = capacity;
        info!(%capacity, "LFU capacity updated");
        Ok(())
    }

    fn save(&self, key: Option<EntityId>, value: V) -> V {
        let Some(key) = key else {
            debug!("No id to cache under, returning value as is");
            return value;
        };

        let mut guard = self.state.lock();
        let state = &mut *guard;
        while needs_eviction(state.entries.len(), state.capacity) {
            if state.evict_least_frequent().is_none() {
                break;
            }
        }

        match state.entries.get_mut(&key) {
            Some(entry) => {
                entry.value = value.clone();
                entry.meta.record_access();
            }
            None => {
                let seq = state.next_seq();
                state
                    .entries
                    .insert(key, CacheEntry::new(value.clone(), LfuMeta::first_save(seq)));
            }
        }
        debug!(key, "Saved object to cache");

        value
    }

    fn get_by_id(&self, key: EntityId) -> Option<V> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        match state.entries.get_mut(&key) {
            Some(entry) => {
                entry.meta.record_access();
                state.stats.record_hit();
                debug!(key, access_count = entry.meta.access_count, "Got object from cache");
                Some(entry.value.clone())
            }
            None => {
                state.stats.record_miss();
                debug!(key, "Cache miss");
                None
            }
        }
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

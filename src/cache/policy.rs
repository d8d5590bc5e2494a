//! Eviction Policy Module
//!
//! The closed set of supported policies and a cache that dispatches to the
//! store chosen at startup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::{Cache, CacheStats, Capacity, EntityId, LfuStore, LruStore};
use crate::error::{CacheError, Result};

// == Eviction Policy ==
/// Which entry leaves the cache when it is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvictionPolicy {
    /// Least recently used
    Lru,
    /// Least frequently used
    Lfu,
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRU" => Ok(EvictionPolicy::Lru),
            "LFU" => Ok(EvictionPolicy::Lfu),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::Lru => write!(f, "LRU"),
            EvictionPolicy::Lfu => write!(f, "LFU"),
        }
    }
}

// == Policy Cache ==
/// A cache whose policy is fixed when it is built.
#[derive(Debug)]
pub enum PolicyCache<V> {
    Lru(LruStore<V>),
    Lfu(LfuStore<V>),
}

impl<V> PolicyCache<V> {
    /// Builds an empty store for `policy`.
    pub fn new(policy: EvictionPolicy, capacity: Capacity) -> Self {
        match policy {
            EvictionPolicy::Lru => PolicyCache::Lru(LruStore::with_capacity(capacity)),
            EvictionPolicy::Lfu => PolicyCache::Lfu(LfuStore::with_capacity(capacity)),
        }
    }

    /// The policy this cache evicts with.
    pub fn policy(&self) -> EvictionPolicy {
        match self {
            PolicyCache::Lru(_) => EvictionPolicy::Lru,
            PolicyCache::Lfu(_) => EvictionPolicy::Lfu,
        }
    }

    fn as_cache(&self) -> &dyn Cache<V>
    where
        V: Clone + Send,
    {
        match self {
            PolicyCache::Lru(store) => store,
            PolicyCache::Lfu(store) => store,
        }
    }
}

impl<V> Cache<V> for PolicyCache<V>
where
    V: Clone + Send,
{
    fn set_capacity(&self, capacity: i64) -> Result<()> {
        self.as_cache().set_capacity(capacity)
    }

    fn save(&self, key: Option<EntityId>, value: V) -> V {
        self.as_cache().save(key, value)
    }

    fn get_by_id(&self, key: EntityId) -> Option<V> {
        self.as_cache().get_by_id(key)
    }

    fn delete(&self, key: EntityId) {
        self.as_cache().delete(key)
    }

    fn contains(&self, key: EntityId) -> bool {
        self.as_cache().contains(key)
    }

    fn len(&self) -> usize {
        self.as_cache().len()
    }

    fn capacity(&self) -> Capacity {
        self.as_cache().capacity()
    }

    fn stats(&self) -> CacheStats {
        self.as_cache().stats()
    }

    fn clear(&self) {
        self.as_cache().clear()
    }
}

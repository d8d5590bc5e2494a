//! Cache Module
//!
//! Bounded in-memory entity caches with LRU and LFU eviction.

mod capacity;
mod entry;
mod lfu;
mod lru;
mod policy;
mod stats;


// Re-export public types
pub use capacity::{needs_eviction, Capacity};
pub use entry::{CacheEntry, LfuMeta, LruMeta};
pub use lfu::LfuStore;
pub use lru::LruStore;
pub use policy::{EvictionPolicy, PolicyCache};
pub use stats::CacheStats;

use crate::error::Result;

/// Identifier of a cached domain object.
pub type EntityId = i64;

// == Cache Facade ==
/// Operations shared by every eviction policy.
///
/// Each call is atomic with respect to every other call on the same cache, so
/// implementations can be shared between threads behind an `Arc`.
pub trait Cache<V>: Send + Sync {
    /// Replaces the capacity. Existing entries are kept; the new limit applies
    /// from the next `save`.
    fn set_capacity(&self, capacity: i64) -> Result<()>;

    /// Caches `value` under `key` and hands the value back.
    ///
    /// When the store is full one entry is evicted first. A `None` key caches
    /// nothing and returns the value untouched.
    fn save(&self, key: Option<EntityId>, value: V) -> V;

    /// Returns the cached value and records the access, or `None` on a miss.
    fn get_by_id(&self, key: EntityId) -> Option<V>;

    /// Removes `key` if present.
    fn delete(&self, key: EntityId);

    /// Checks residency without counting as an access.
    fn contains(&self, key: EntityId) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Currently configured capacity.
    fn capacity(&self) -> Capacity;

    /// Snapshot of hit, miss and eviction counters.
    fn stats(&self) -> CacheStats;

    /// Drops every entry. Counters are kept.
    fn clear(&self);
}

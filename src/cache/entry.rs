//! Cache Entry Module
//!
//! Keeps a cached value next to the access metadata its policy needs, so a key
//! can never have one without the other.

// == Cache Entry ==
/// A resident value and its policy-specific access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V, M> {
    /// The cached value
    pub value: V,
    /// Access metadata (last-touched tick for LRU, counter for LFU)
    pub meta: M,
}

impl<V, M> CacheEntry<V, M> {
    // == Constructor ==
    /// Creates a new entry.
    pub fn new(value: V, meta: M) -> Self {
        Self { value, meta }
    }
}

// == LRU Metadata ==
/// Access metadata for the LRU policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruMeta {
    /// Logical tick of the last save or hit
    pub last_touched: u64,
}

// == LFU Metadata ==
/// Access metadata for the LFU policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuMeta {
    /// Number of saves and hits since the key became resident, starts at 1
    pub access_count: u64,
    /// Position of the key in insertion order
    pub inserted_seq: u64,
}

impl LfuMeta {
    /// Metadata for a key that just became resident.
    pub fn first_save(inserted_seq: u64) -> Self {
        Self {
            access_count: 1,
            inserted_seq,
        }
    }

    /// Records one more save or hit.
    pub fn record_access(&mut self) {
        self.access_count = self.access_count.saturating_add(1);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("value", LruMeta { last_touched: 7 });

        assert_eq!(entry.value, "value");
        assert_eq!(entry.meta.last_touched, 7);
    }

    #[test]
    fn test_lfu_meta_starts_at_one() {
        let meta = LfuMeta::first_save(4);

        assert_eq!(meta.access_count, 1);
        assert_eq!(meta.inserted_seq, 4);
    }

    #[test]
    fn test_lfu_meta_record_access() {
        let mut meta = LfuMeta::first_save(0);
        meta.record_access();
        meta.record_access();

        assert_eq!(meta.access_count, 3);
        // Insertion position is not an access property
        assert_eq!(meta.inserted_seq, 0);
    }
}

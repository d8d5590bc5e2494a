//! Capacity Policy Module
//!
//! Decides when a store is full. Shared by every eviction policy.

use std::fmt;

use crate::error::{CacheError, Result};

// == Capacity ==
/// Maximum number of resident entries, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Capacity(usize);

impl Capacity {
    // == Constructor ==
    /// Validates a configured capacity.
    ///
    /// Zero and negative values are configuration errors.
    pub fn new(n: i64) -> Result<Self> {
        if n <= 0 {
            return Err(CacheError::InvalidCapacity(format!(
                "capacity must be a positive integer, got {}",
                n
            )));
        }
        usize::try_from(n)
            .map(Self)
            .map_err(|_| CacheError::InvalidCapacity(format!("capacity {} is too large", n)))
    }

    // == Get ==
    /// Returns the capacity as a number of entries.
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// == Needs Eviction ==
/// Returns true when a store holding `len` entries must evict before inserting.
pub fn needs_eviction(len: usize, capacity: Capacity) -> bool {
    len >= capacity.get()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_positive() {
        let capacity = Capacity::new(3).unwrap();
        assert_eq!(capacity.get(), 3);
        assert_eq!(capacity.to_string(), "3");
    }

    #[test]
    fn test_capacity_zero_rejected() {
        assert!(matches!(Capacity::new(0), Err(CacheError::InvalidCapacity(_))));
    }

    #[test]
    fn test_capacity_negative_rejected() {
        assert!(matches!(Capacity::new(-5), Err(CacheError::InvalidCapacity(_))));
    }

    #[test]
    fn test_needs_eviction_boundary() {
        let capacity = Capacity::new(2).unwrap();

        assert!(!needs_eviction(0, capacity));
        assert!(!needs_eviction(1, capacity));
        // At capacity the next insert must evict first
        assert!(needs_eviction(2, capacity));
        assert!(needs_eviction(3, capacity));
    }
}

//! Error types for the entity cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Configuration errors raised while setting up a cache.
///
/// Lookups never fail: a missing key is reported as `None`, not as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity is zero, negative or not a number
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    /// Eviction policy name is not recognised
    #[error("Unknown eviction policy: {0}")]
    UnknownPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for the entity cache.
pub type Result<T> = std::result::Result<T, CacheError>;

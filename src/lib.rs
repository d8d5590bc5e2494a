//! Entity Cache - A bounded in-memory cache for domain objects
//!
//! Provides fixed-capacity caches with LRU or LFU eviction and a cache-aside
//! interceptor for business read/write operations.

pub mod cache;
pub mod config;
pub mod error;
pub mod interceptor;

pub use cache::{Cache, EntityId, EvictionPolicy, PolicyCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use interceptor::{CacheInterceptor, IdExtractorRegistry};

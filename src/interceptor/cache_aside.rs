//! Cache-Aside Interceptor
//!
//! Wraps business operations so reads are served from the cache when possible
//! and writes keep the cache in step with the source of truth.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{Cache, EntityId};
use crate::interceptor::IdExtractorRegistry;

// == Cache Interceptor ==
/// Decorates read, create, update and delete operations with cache calls.
///
/// With no cache configured every operation runs untouched.
pub struct CacheInterceptor<V> {
    cache: Option<Arc<dyn Cache<V>>>,
    extractors: Arc<IdExtractorRegistry<V>>,
}

impl<V> Clone for CacheInterceptor<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            extractors: Arc::clone(&self.extractors),
        }
    }
}

impl<V> fmt::Debug for CacheInterceptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheInterceptor")
            .field("enabled", &self.cache.is_some())
            .field("extractors", &self.extractors)
            .finish()
    }
}

impl<V> CacheInterceptor<V>
where
    V: Clone + Send + 'static,
{
    // == Constructors ==
    /// Creates an interceptor backed by `cache`.
    pub fn new(cache: Arc<dyn Cache<V>>, extractors: IdExtractorRegistry<V>) -> Self {
        Self {
            cache: Some(cache),
            extractors: Arc::new(extractors),
        }
    }

    /// Creates an interceptor that never caches.
    pub fn disabled(extractors: IdExtractorRegistry<V>) -> Self {
        Self {
            cache: None,
            extractors: Arc::new(extractors),
        }
    }

    /// Creates an interceptor from an optional cache.
    pub fn from_cache(cache: Option<Arc<dyn Cache<V>>>, extractors: IdExtractorRegistry<V>) -> Self {
        match cache {
            Some(cache) => Self::new(cache, extractors),
            None => Self::disabled(extractors),
        }
    }

    /// The backing cache, if caching is enabled.
    pub fn cache(&self) -> Option<&Arc<dyn Cache<V>>> {
        self.cache.as_ref()
    }

    // == Read By Id ==
    /// Returns the cached value for `id`, or runs `op` and caches its result.
    pub async fn read_by_id<F, Fut, E>(&self, kind: &str, id: EntityId, op: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(cache) = &self.cache {
            if let Some(value) = cache.get_by_id(id) {
                debug!(kind, id, "Read served from cache");
                return Ok(value);
            }
        }

        let value = op().await?;
        Ok(self.store_result(kind, value))
    }

    // == Create ==
    /// Runs `op` and caches the created object.
    pub async fn create<F, Fut, E>(&self, kind: &str, op: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let value = op().await?;
        Ok(self.store_result(kind, value))
    }

    // == Update ==
    /// Runs `op` and replaces the cached copy with the updated object.
    pub async fn update<F, Fut, E>(&self, kind: &str, op: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let value = op().await?;
        Ok(self.store_result(kind, value))
    }

    // == Delete By Id ==
    /// Runs `op` and then drops `id` from the cache.
    ///
    /// A failed operation leaves the cache untouched.
    pub async fn delete_by_id<F, Fut, T, E>(&self, id: EntityId, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let output = op().await?;
        if let Some(cache) = &self.cache {
            cache.delete(id);
            debug!(id, "Removed deleted object from cache");
        }
        Ok(output)
    }

    fn store_result(&self, kind: &str, value: V) -> V {
        let Some(cache) = &self.cache else {
            return value;
        };
        match self.extractors.get(kind) {
            Some(extract) => {
                let id = extract(&value);
                cache.save(id, value)
            }
            None => {
                debug!(kind, "Result kind is not cacheable");
                value
            }
        }
    }
}

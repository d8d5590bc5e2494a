//! Id Extractor Registry
//!
//! Maps a result kind to the function that reads its id, so the interceptor
//! knows which results can be cached and under which key.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::cache::EntityId;

/// Reads the cache key out of a result. `None` means the result has no id.
pub type IdExtractor<V> = Arc<dyn Fn(&V) -> Option<EntityId> + Send + Sync>;

// == Registry ==
/// Table of cacheable result kinds.
pub struct IdExtractorRegistry<V> {
    extractors: HashMap<&'static str, IdExtractor<V>>,
}

impl<V> IdExtractorRegistry<V> {
    // == Constructor ==
    /// Creates an empty registry. Nothing is cacheable until registered.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    // == Register ==
    /// Adds (or replaces) the extractor for `kind`.
    pub fn register<F>(mut self, kind: &'static str, extractor: F) -> Self
    where
        F: Fn(&V) -> Option<EntityId> + Send + Sync + 'static,
    {
        self.extractors.insert(kind, Arc::new(extractor));
        self
    }

    // == Lookup ==
    /// Returns the extractor for `kind`, if it was registered.
    pub fn get(&self, kind: &str) -> Option<&IdExtractor<V>> {
        self.extractors.get(kind)
    }

    /// Whether results of `kind` are cached.
    pub fn is_registered(&self, kind: &str) -> bool {
        self.extractors.contains_key(kind)
    }

    /// Registered kinds, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.extractors.keys().copied()
    }
}

impl<V> Default for IdExtractorRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for IdExtractorRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdExtractorRegistry")
            .field("kinds", &self.extractors.keys().collect::<Vec<_>>())
            .finish()
    }
}

// == JSON Extractor ==
/// Builds an extractor for JSON results that reads an integer `field`.
///
/// Missing, null and non-integer fields yield `None`.
pub fn json_field_extractor(
    field: &'static str,
) -> impl Fn(&Value) -> Option<EntityId> + Send + Sync + 'static {
    move |value: &Value| value.get(field).and_then(Value::as_i64)
}

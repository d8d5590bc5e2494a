//! Configuration Module
//!
//! Loads cache settings from environment variables and validates them once at
//! startup.

use std::env;
use std::sync::Arc;

use crate::cache::{Capacity, EvictionPolicy, PolicyCache};
use crate::error::{CacheError, Result};

/// Capacity used when `CACHE_CAPACITY` is not set.
pub const DEFAULT_CAPACITY: i64 = 100;

/// Raw configuration as read from the environment.
///
/// Cache settings are kept unparsed until [`Config::validate`] so that a bad
/// value stops startup instead of silently falling back to a default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Eviction policy name; unset disables caching
    pub cache_type: Option<String>,
    /// Maximum number of cached entries
    pub capacity: Option<String>,
    /// Number of concurrent workers in the demo workload
    pub workload_tasks: usize,
    /// Reads issued by each demo worker
    pub workload_reads: usize,
}

/// Validated cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub policy: EvictionPolicy,
    pub capacity: Capacity,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TYPE` - `LRU` or `LFU` (unset: caching disabled)
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `WORKLOAD_TASKS` - Demo workers (default: 8)
    /// - `WORKLOAD_READS` - Reads per demo worker (default: 200)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cache_type: lookup("CACHE_TYPE").filter(|v| !v.trim().is_empty()),
            capacity: lookup("CACHE_CAPACITY"),
            workload_tasks: lookup("WORKLOAD_TASKS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            workload_reads: lookup("WORKLOAD_READS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
        }
    }

    /// Checks the cache settings.
    ///
    /// Returns `Ok(None)` when no policy is configured.
    pub fn validate(&self) -> Result<Option<CacheSettings>> {
        let Some(cache_type) = &self.cache_type else {
            return Ok(None);
        };
        let policy: EvictionPolicy = cache_type.parse()?;

        let capacity = match &self.capacity {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                CacheError::InvalidCapacity(format!("'{}' is not an integer", raw))
            })?,
            None => DEFAULT_CAPACITY,
        };
        let capacity = Capacity::new(capacity)?;

        Ok(Some(CacheSettings { policy, capacity }))
    }

    /// Validates the settings and builds the configured cache.
    pub fn build_cache<V>(&self) -> Result<Option<Arc<PolicyCache<V>>>> {
        Ok(self
            .validate()?
            .map(|settings| Arc::new(PolicyCache::new(settings.policy, settings.capacity))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config(&[]);
        assert!(config.cache_type.is_none());
        assert_eq!(config.workload_tasks, 8);
        assert_eq!(config.workload_reads, 200);
        assert_eq!(config.validate().unwrap(), None);
    }

    #[test]
    fn test_config_lru_default_capacity() {
        let settings = config(&[("CACHE_TYPE", "LRU")]).validate().unwrap().unwrap();
        assert_eq!(settings.policy, EvictionPolicy::Lru);
        assert_eq!(settings.capacity.get(), DEFAULT_CAPACITY as usize);
    }

    #[test]
    fn test_config_lfu_with_capacity() {
        let settings = config(&[("CACHE_TYPE", "lfu"), ("CACHE_CAPACITY", "25")])
            .validate()
            .unwrap()
            .unwrap();
        assert_eq!(settings.policy, EvictionPolicy::Lfu);
        assert_eq!(settings.capacity.get(), 25);
    }

    #[test]
    fn test_config_blank_type_disables_cache() {
        assert_eq!(config(&[("CACHE_TYPE", "  ")]).validate().unwrap(), None);
    }

    #[test]
    fn test_config_rejects_bad_capacity() {
        for raw in ["0", "-10", "lots"] {
            let result = config(&[("CACHE_TYPE", "LRU"), ("CACHE_CAPACITY", raw)]).validate();
            assert!(
                matches!(result, Err(CacheError::InvalidCapacity(_))),
                "capacity {} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        let result = config(&[("CACHE_TYPE", "MRU")]).validate();
        assert!(matches!(result, Err(CacheError::UnknownPolicy(_))));
    }

    #[test]
    fn test_config_workload_falls_back_on_garbage() {
        let config = config(&[("WORKLOAD_TASKS", "many"), ("WORKLOAD_READS", "5")]);
        assert_eq!(config.workload_tasks, 8);
        assert_eq!(config.workload_reads, 5);
    }

    #[test]
    fn test_build_cache() {
        let cache = config(&[("CACHE_TYPE", "LFU"), ("CACHE_CAPACITY", "3")])
            .build_cache::<String>()
            .unwrap()
            .unwrap();
        assert_eq!(cache.policy(), EvictionPolicy::Lfu);

        assert!(config(&[]).build_cache::<String>().unwrap().is_none());
    }
}

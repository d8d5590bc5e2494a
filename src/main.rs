//! Entity Cache - demo service
//!
//! Runs a concurrent cache-aside workload against an in-memory news
//! repository using the configured eviction policy.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use entity_cache::interceptor::json_field_extractor;
use entity_cache::{Cache, CacheInterceptor, Config, EntityId, IdExtractorRegistry};

/// Number of distinct news items in the demo repository.
const NEWS_COUNT: EntityId = 50;

/// Simulated latency of the source of truth.
const REPOSITORY_LATENCY: Duration = Duration::from_millis(2);

/// Stand-in for the persistent news store.
#[derive(Clone, Default)]
struct NewsRepository {
    rows: Arc<RwLock<HashMap<EntityId, Value>>>,
}

impl NewsRepository {
    async fn seed(&self, count: EntityId) {
        let mut rows = self.rows.write().await;
        for id in 1..=count {
            rows.insert(id, json!({"id": id, "title": format!("News #{}", id), "version": 0}));
        }
    }

    async fn find_by_id(&self, id: EntityId) -> anyhow::Result<Value> {
        tokio::time::sleep(REPOSITORY_LATENCY).await;
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .with_context(|| format!("news with id {} not found", id))
    }

    async fn update(&self, id: EntityId) -> anyhow::Result<Value> {
        tokio::time::sleep(REPOSITORY_LATENCY).await;
        let mut rows = self.rows.write().await;
        let row = rows
            .get_mut(&id)
            .with_context(|| format!("news with id {} not found", id))?;
        let version = row["version"].as_i64().unwrap_or(0) + 1;
        row["version"] = json!(version);
        Ok(row.clone())
    }
}

/// Main entry point for the entity cache demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration (invalid settings abort startup)
/// 3. Build the cache and the cache-aside interceptor
/// 4. Run concurrent readers plus a writer against the repository
/// 5. Report cache statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "entity_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting entity cache demo");

    let config = Config::from_env();
    let cache = config
        .build_cache::<Value>()
        .context("invalid cache configuration")?;

    match &cache {
        Some(cache) => info!(
            policy = %cache.policy(),
            capacity = %cache.capacity(),
            "Cache configured"
        ),
        None => warn!("CACHE_TYPE not set, caching disabled"),
    }

    let registry = IdExtractorRegistry::new().register("news", json_field_extractor("id"));
    let interceptor = CacheInterceptor::from_cache(
        cache.clone().map(|cache| cache as Arc<dyn Cache<Value>>),
        registry,
    );

    let repository = NewsRepository::default();
    repository.seed(NEWS_COUNT).await;

    info!(
        "Running workload: tasks={}, reads per task={}",
        config.workload_tasks, config.workload_reads
    );

    let mut handles = Vec::with_capacity(config.workload_tasks + 1);
    for task in 0..config.workload_tasks {
        let interceptor = interceptor.clone();
        let repository = repository.clone();
        let reads = config.workload_reads;

        handles.push(tokio::spawn(async move {
            for i in 0..reads {
                // Skewed access: low ids are requested far more often
                let spread = ((task * 7 + i * 3) % NEWS_COUNT as usize) as EntityId + 1;
                let id = if i % 3 == 0 { spread } else { spread % 10 + 1 };
                interceptor
                    .read_by_id("news", id, || repository.find_by_id(id))
                    .await?;
            }
            anyhow::Ok(())
        }));
    }

    {
        let interceptor = interceptor.clone();
        let repository = repository.clone();
        handles.push(tokio::spawn(async move {
            for id in (1..=NEWS_COUNT).step_by(5) {
                interceptor
                    .update("news", || repository.update(id))
                    .await?;
            }
            anyhow::Ok(())
        }));
    }

    for handle in handles {
        handle.await.context("workload task panicked")??;
    }

    match &cache {
        Some(cache) => {
            let stats = cache.stats();
            info!(hit_rate = stats.hit_rate(), "Workload finished");
            info!("Cache stats: {}", serde_json::to_string(&stats)?);
        }
        None => info!("Workload finished without cache"),
    }

    Ok(())
}

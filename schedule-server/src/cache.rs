//! Caching layer for route schedules.
//!
//! Schedule generation on the route store is slow, and one page view asks
//! for the same route several times (grid, board, timetable). Converted
//! route schedules are cached per route id with a TTL. The views are never
//! cached; they are recomputed from the cached input on every request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::scheduler::{RouteSchedule, SchedulerClient, SchedulerError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached routes.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 256,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Converted route schedules keyed by route id.
pub struct ScheduleCache {
    routes: MokaCache<String, Arc<RouteSchedule>>,
}

impl ScheduleCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    pub async fn get(&self, id: &str) -> Option<Arc<RouteSchedule>> {
        self.routes.get(id).await
    }

    pub async fn insert(&self, id: String, entry: Arc<RouteSchedule>) {
        self.routes.insert(id, entry).await;
    }

    /// Drop one route, e.g. after it was regenerated upstream.
    pub async fn invalidate(&self, id: &str) {
        self.routes.invalidate(id).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }
}

/// Scheduler client with caching.
pub struct CachedSchedulerClient {
    client: SchedulerClient,
    cache: ScheduleCache,
}

impl CachedSchedulerClient {
    pub fn new(client: SchedulerClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: ScheduleCache::new(cache_config),
        }
    }

    /// Get a route and its schedule, using the cache if available.
    ///
    /// Failures are not cached; the next request retries the route store.
    pub async fn fetch_route_schedule(
        &self,
        id: &str,
    ) -> Result<Arc<RouteSchedule>, SchedulerError> {
        if let Some(cached) = self.cache.get(id).await {
            debug!(route = id, "schedule cache hit");
            return Ok(cached);
        }

        let entry = Arc::new(self.client.fetch_route_schedule(id).await?);
        self.cache.insert(id.to_string(), entry.clone()).await;

        Ok(entry)
    }

    pub fn cache(&self) -> &ScheduleCache {
        &self.cache
    }
}

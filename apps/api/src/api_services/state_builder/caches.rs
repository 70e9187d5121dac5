use std::sync::Arc;

use rolegate_application::AggregateCache;
use rolegate_infrastructure::{InMemoryAggregateCache, RedisAggregateCache};

use crate::api_config::ApiConfig;

pub(super) struct AggregateCacheSet {
    pub(super) aggregate_cache: Arc<dyn AggregateCache>,
    pub(super) redis_cache: Option<RedisAggregateCache>,
    pub(super) backend: &'static str,
}

pub(super) fn build_aggregate_caches(
    config: &ApiConfig,
    redis_client: Option<redis::Client>,
) -> AggregateCacheSet {
    match redis_client {
        Some(redis_client) => {
            let redis_cache =
                RedisAggregateCache::new(redis_client, config.redis_key_prefix.as_str());
            AggregateCacheSet {
                aggregate_cache: Arc::new(redis_cache.clone()),
                redis_cache: Some(redis_cache),
                backend: "redis",
            }
        }
        None => AggregateCacheSet {
            aggregate_cache: Arc::new(InMemoryAggregateCache::new()),
            redis_cache: None,
            backend: "in_memory",
        },
    }
}

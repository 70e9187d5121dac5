//! Redis-backed aggregate cache.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use rolegate_application::AggregateCache;
use rolegate_core::{AppError, AppResult};

/// Redis implementation of the aggregate cache port.
#[derive(Clone)]
pub struct RedisAggregateCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisAggregateCache {
    /// Creates a cache adapter with a configured Redis client and key prefix.
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    /// Round-trips a `PING` to verify connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        let mut connection = self.connection().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut connection)
            .await
            .map(|_| ())
            .map_err(|error| AppError::Internal(format!("redis ping failed: {error}")))
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}:{key}", self.key_prefix)
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|error| AppError::Internal(format!("failed to connect to redis: {error}")))
    }
}

/// Converts a TTL to whole seconds for `SET EX`, rounding up so entries
/// never expire early. `EX` rejects zero, so the minimum is one second.
fn expiry_seconds(ttl: Duration) -> u64 {
    let whole = ttl.as_secs();
    let rounded = if ttl.subsec_nanos() > 0 {
        whole.saturating_add(1)
    } else {
        whole
    };
    rounded.max(1)
}

#[async_trait]
impl AggregateCache for RedisAggregateCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let mut connection = self.connection().await?;
        connection
            .get(self.key_for(key))
            .await
            .map_err(|error| AppError::Internal(format!("failed to read cache entry: {error}")))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()> {
        let mut connection = self.connection().await?;
        connection
            .set_ex(self.key_for(key), value, expiry_seconds(ttl))
            .await
            .map_err(|error| AppError::Internal(format!("failed to write cache entry: {error}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut connection = self.connection().await?;
        connection
            .del(self.key_for(key))
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete cache entry: {error}")))
    }
}

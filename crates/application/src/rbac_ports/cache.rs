use std::time::Duration;

use async_trait::async_trait;
use rolegate_core::AppResult;

/// Keyed byte store for precomputed read models.
///
/// Entries are opaque to the cache; callers own the encoding. The cache is
/// never authoritative and may drop entries at any time.
#[async_trait]
pub trait AggregateCache: Send + Sync {
    /// Returns the stored bytes for a key, or `None` on a miss.
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Stores bytes under a key for at most `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()>;

    /// Removes a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;
}

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rolegate_application::AggregateCache;
use rolegate_core::AppResult;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct AggregateCacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory aggregate cache adapter.
#[derive(Default)]
pub struct InMemoryAggregateCache {
    entries: RwLock<HashMap<String, AggregateCacheEntry>>,
}

impl InMemoryAggregateCache {
    /// Creates an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AggregateCache for InMemoryAggregateCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            return Ok(());
        }

        let now = Instant::now();
        let expires_at = now.checked_add(ttl).unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(key.to_owned(), AggregateCacheEntry { value, expires_at });

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

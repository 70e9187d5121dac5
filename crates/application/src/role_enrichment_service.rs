use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{EnrichedRole, RoleId};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{AggregateCache, RolePermissionRepository, RoleRepository};

mod codec;

/// Key namespace for enriched role cache entries.
pub const ENRICHED_ROLE_CACHE_KEY_PREFIX: &str = "enriched_role";

/// Cache behavior for enriched roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichedRoleCacheSettings {
    /// Lifetime of a cache entry. Zero disables caching entirely.
    pub ttl: Duration,
    /// Upper bound for any single cache call.
    pub operation_timeout: Duration,
}

impl EnrichedRoleCacheSettings {
    /// Returns whether cache reads and writes are enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

impl Default for EnrichedRoleCacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            operation_timeout: Duration::from_millis(250),
        }
    }
}

/// Serves role aggregates through an optional cache-aside layer.
///
/// The entity store stays authoritative. Cache failures of any kind degrade
/// to a store read and are never surfaced to callers of [`Self::get`].
#[derive(Clone)]
pub struct RoleEnrichmentService {
    role_repository: Arc<dyn RoleRepository>,
    role_permission_repository: Arc<dyn RolePermissionRepository>,
    cache: Option<Arc<dyn AggregateCache>>,
    cache_settings: EnrichedRoleCacheSettings,
}

impl RoleEnrichmentService {
    /// Creates an uncached enrichment service.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        role_permission_repository: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        Self {
            role_repository,
            role_permission_repository,
            cache: None,
            cache_settings: EnrichedRoleCacheSettings::default(),
        }
    }

    /// Adds the aggregate cache.
    #[must_use]
    pub fn with_cache(
        mut self,
        cache: Arc<dyn AggregateCache>,
        cache_settings: EnrichedRoleCacheSettings,
    ) -> Self {
        self.cache = Some(cache);
        self.cache_settings = cache_settings;
        self
    }

    /// Returns the cache key for one role.
    #[must_use]
    pub fn cache_key(role_id: RoleId) -> String {
        format!("{ENRICHED_ROLE_CACHE_KEY_PREFIX}:{role_id}")
    }

    /// Returns the role with its permissions, preferring a cached copy.
    pub async fn get(&self, role_id: RoleId) -> AppResult<EnrichedRole> {
        if let Some(enriched) = self.read_cached(role_id).await {
            return Ok(enriched);
        }

        let enriched = self.load(role_id).await?;

        if self.active_cache().is_some() {
            let expires_at = TimeDelta::from_std(self.cache_settings.ttl)
                .ok()
                .and_then(|ttl| Utc::now().checked_add_signed(ttl));
            let stored = match expires_at {
                Some(expires_at) => self.put(&enriched, expires_at).await,
                None => Err(AppError::Internal(
                    "enriched role cache ttl is out of range".to_owned(),
                )),
            };
            if let Err(error) = stored {
                warn!(%role_id, %error, "failed to store enriched role in cache");
            }
        }

        Ok(enriched)
    }

    /// Writes an aggregate to the cache until `expires_at`.
    ///
    /// A no-op when caching is disabled. Fails when `expires_at` is not in
    /// the future.
    pub async fn put(&self, enriched: &EnrichedRole, expires_at: DateTime<Utc>) -> AppResult<()> {
        let remaining = expires_at - Utc::now();
        if remaining <= TimeDelta::zero() {
            return Err(AppError::Internal(format!(
                "enriched role cache expiration time {expires_at} is in the past"
            )));
        }

        let Some(cache) = self.active_cache() else {
            return Ok(());
        };

        let ttl = remaining.to_std().map_err(|error| {
            AppError::Internal(format!("invalid enriched role cache ttl: {error}"))
        })?;
        let payload = codec::encode(enriched)?;
        let key = Self::cache_key(enriched.role_id());

        match timeout(
            self.cache_settings.operation_timeout,
            cache.set(&key, payload, ttl),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AppError::Internal(format!(
                "enriched role cache write timed out after {} ms",
                self.cache_settings.operation_timeout.as_millis()
            ))),
        }
    }

    /// Drops the cached aggregate for a role.
    ///
    /// Failures are logged and absorbed; a surviving entry expires with its TTL.
    pub async fn invalidate(&self, role_id: RoleId) {
        let Some(cache) = self.active_cache() else {
            return;
        };

        let key = Self::cache_key(role_id);
        match timeout(self.cache_settings.operation_timeout, cache.delete(&key)).await {
            Ok(Ok(())) => debug!(%role_id, "invalidated enriched role cache entry"),
            Ok(Err(error)) => {
                warn!(%role_id, %error, "failed to invalidate enriched role cache entry");
            }
            Err(_) => warn!(%role_id, "enriched role cache invalidation timed out"),
        }
    }

    fn active_cache(&self) -> Option<&Arc<dyn AggregateCache>> {
        if self.cache_settings.is_enabled() {
            self.cache.as_ref()
        } else {
            None
        }
    }

    async fn read_cached(&self, role_id: RoleId) -> Option<EnrichedRole> {
        let cache = self.active_cache()?;
        let key = Self::cache_key(role_id);

        match timeout(self.cache_settings.operation_timeout, cache.get(&key)).await {
            Ok(Ok(Some(payload))) => match codec::decode(&payload, role_id) {
                Ok(enriched) => {
                    debug!(%role_id, "enriched role cache hit");
                    Some(enriched)
                }
                Err(error) => {
                    warn!(%role_id, %error, "discarding undecodable enriched role cache entry");
                    None
                }
            },
            Ok(Ok(None)) => {
                debug!(%role_id, "enriched role cache miss");
                None
            }
            Ok(Err(error)) => {
                warn!(%role_id, %error, "enriched role cache read failed");
                None
            }
            Err(_) => {
                warn!(%role_id, "enriched role cache read timed out");
                None
            }
        }
    }

    async fn load(&self, role_id: RoleId) -> AppResult<EnrichedRole> {
        let role = self
            .role_repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        let permissions = self
            .role_permission_repository
            .list_role_permissions(role_id)
            .await?;

        Ok(EnrichedRole::new(role, permissions))
    }
}

#[cfg(test)]
mod tests;

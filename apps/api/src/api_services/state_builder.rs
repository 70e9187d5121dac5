use rolegate_application::{
    AuthorizationService, PermissionService, RoleEnrichmentService, RolePermissionService,
    RoleService, UserRoleService,
};
use rolegate_core::AppResult;
use rolegate_infrastructure::PgPools;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppState;

use super::redis::build_redis_client;

mod caches;
mod repositories;

pub fn build_app_state(pools: Option<PgPools>, config: &ApiConfig) -> AppResult<AppState> {
    let redis_client = config
        .redis_url
        .as_deref()
        .map(build_redis_client)
        .transpose()?;

    let repositories = repositories::build_repository_set(pools.as_ref());
    let caches = caches::build_aggregate_caches(config, redis_client);

    let enrichment = RoleEnrichmentService::new(
        repositories.role_repository.clone(),
        repositories.role_permission_repository.clone(),
    )
    .with_cache(caches.aggregate_cache, config.enriched_role_cache);

    info!(
        cache_backend = caches.backend,
        cache_enabled = config.enriched_role_cache.is_enabled(),
        ttl_seconds = config.enriched_role_cache.ttl.as_secs(),
        "enriched role cache configured"
    );

    Ok(AppState {
        authorization_service: AuthorizationService::new(
            repositories.permission_repository.clone(),
            repositories.user_role_repository.clone(),
            repositories.role_permission_repository.clone(),
        ),
        role_service: RoleService::new(repositories.role_repository.clone(), enrichment.clone()),
        permission_service: PermissionService::new(
            repositories.permission_repository,
            repositories.role_repository,
            repositories.role_permission_repository.clone(),
        ),
        role_permission_service: RolePermissionService::new(
            repositories.role_permission_repository,
            enrichment,
        ),
        user_role_service: UserRoleService::new(repositories.user_role_repository),
        postgres_pools: pools,
        redis_cache: caches.redis_cache,
    })
}

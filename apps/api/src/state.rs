use rolegate_application::{
    AuthorizationService, PermissionService, RolePermissionService, RoleService, UserRoleService,
};
use rolegate_infrastructure::{PgPools, RedisAggregateCache};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub role_service: RoleService,
    pub permission_service: PermissionService,
    pub role_permission_service: RolePermissionService,
    pub user_role_service: UserRoleService,
    pub postgres_pools: Option<PgPools>,
    pub redis_cache: Option<RedisAggregateCache>,
}

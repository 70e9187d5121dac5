use std::sync::Arc;

use rolegate_application::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};
use rolegate_infrastructure::{
    InMemoryRbacStore, PgPools, PostgresPermissionRepository, PostgresRolePermissionRepository,
    PostgresRoleRepository, PostgresUserRoleRepository,
};

pub(super) struct RepositorySet {
    pub(super) role_repository: Arc<dyn RoleRepository>,
    pub(super) permission_repository: Arc<dyn PermissionRepository>,
    pub(super) user_role_repository: Arc<dyn UserRoleRepository>,
    pub(super) role_permission_repository: Arc<dyn RolePermissionRepository>,
}

pub(super) fn build_repository_set(pools: Option<&PgPools>) -> RepositorySet {
    match pools {
        Some(pools) => RepositorySet {
            role_repository: Arc::new(PostgresRoleRepository::new(pools.clone())),
            permission_repository: Arc::new(PostgresPermissionRepository::new(pools.clone())),
            user_role_repository: Arc::new(PostgresUserRoleRepository::new(pools.clone())),
            role_permission_repository: Arc::new(PostgresRolePermissionRepository::new(
                pools.clone(),
            )),
        },
        None => {
            let store = Arc::new(InMemoryRbacStore::new());
            RepositorySet {
                role_repository: store.clone(),
                permission_repository: store.clone(),
                user_role_repository: store.clone(),
                role_permission_repository: store,
            }
        }
    }
}

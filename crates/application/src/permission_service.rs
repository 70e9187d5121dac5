use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Permission, PermissionId, Role, RoleId};
use tracing::info;

use crate::{
    NewPermissionInput, PermissionFilter, PermissionRepository, RolePermissionRepository,
    RoleRepository,
};

/// Permission catalog use-cases.
#[derive(Clone)]
pub struct PermissionService {
    permission_repository: Arc<dyn PermissionRepository>,
    role_repository: Arc<dyn RoleRepository>,
    role_permission_repository: Arc<dyn RolePermissionRepository>,
}

impl PermissionService {
    /// Creates a permission service.
    #[must_use]
    pub fn new(
        permission_repository: Arc<dyn PermissionRepository>,
        role_repository: Arc<dyn RoleRepository>,
        role_permission_repository: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        Self {
            permission_repository,
            role_repository,
            role_permission_repository,
        }
    }

    /// Registers a new (resource, action) pair.
    pub async fn create_permission(&self, input: NewPermissionInput) -> AppResult<Permission> {
        let permission = self.permission_repository.create_permission(input).await?;
        info!(
            permission_id = %permission.id(),
            resource = permission.resource().as_str(),
            action = permission.action().as_str(),
            "permission created"
        );
        Ok(permission)
    }

    /// Returns one permission.
    pub async fn get_permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.permission_repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }

    /// Lists permissions matching a filter.
    pub async fn list_permissions(&self, filter: &PermissionFilter) -> AppResult<Vec<Permission>> {
        self.permission_repository.list_permissions(filter).await
    }

    /// Lists the permissions carried by a live role.
    pub async fn list_permissions_by_role(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        if self.role_repository.find_role(role_id).await?.is_none() {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        self.role_permission_repository
            .list_role_permissions(role_id)
            .await
    }

    /// Lists the live roles carrying a permission.
    pub async fn list_roles_by_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Vec<Role>> {
        self.get_permission(permission_id).await?;
        self.permission_repository
            .list_roles_by_permission(permission_id)
            .await
    }
}

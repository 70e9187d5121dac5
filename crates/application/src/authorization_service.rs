use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{PermissionAction, PermissionResource, RoleId, UserId};
use tracing::debug;

use crate::{PermissionRepository, RolePermissionRepository, UserRoleRepository};

/// Answers whether a user may perform an action on a resource.
///
/// A user is allowed when at least one of their live roles carries the
/// (resource, action) permission. Unknown permissions deny.
#[derive(Clone)]
pub struct AuthorizationService {
    permission_repository: Arc<dyn PermissionRepository>,
    user_role_repository: Arc<dyn UserRoleRepository>,
    role_permission_repository: Arc<dyn RolePermissionRepository>,
}

enum GrantResolution {
    Granted(RoleId),
    UnknownPermission,
    NotGranted,
}

impl AuthorizationService {
    /// Creates an authorization service from repository implementations.
    #[must_use]
    pub fn new(
        permission_repository: Arc<dyn PermissionRepository>,
        user_role_repository: Arc<dyn UserRoleRepository>,
        role_permission_repository: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        Self {
            permission_repository,
            user_role_repository,
            role_permission_repository,
        }
    }

    /// Succeeds when the user holds the permission and fails with
    /// `PermissionDenied` otherwise. Store failures propagate unchanged.
    pub async fn check_permission(
        &self,
        user_id: UserId,
        resource: &PermissionResource,
        action: &PermissionAction,
    ) -> AppResult<()> {
        match self.resolve_grant(user_id, resource, action).await? {
            GrantResolution::Granted(role_id) => {
                debug!(
                    %user_id,
                    %role_id,
                    resource = resource.as_str(),
                    action = action.as_str(),
                    "permission granted"
                );
                Ok(())
            }
            GrantResolution::UnknownPermission => {
                debug!(
                    %user_id,
                    resource = resource.as_str(),
                    action = action.as_str(),
                    "permission denied: no such permission"
                );
                Err(denied(user_id, resource, action))
            }
            GrantResolution::NotGranted => {
                debug!(
                    %user_id,
                    resource = resource.as_str(),
                    action = action.as_str(),
                    "permission denied: no role grants it"
                );
                Err(denied(user_id, resource, action))
            }
        }
    }

    /// Returns whether the user holds the permission.
    pub async fn has_permission(
        &self,
        user_id: UserId,
        resource: &PermissionResource,
        action: &PermissionAction,
    ) -> AppResult<bool> {
        Ok(matches!(
            self.resolve_grant(user_id, resource, action).await?,
            GrantResolution::Granted(_)
        ))
    }

    async fn resolve_grant(
        &self,
        user_id: UserId,
        resource: &PermissionResource,
        action: &PermissionAction,
    ) -> AppResult<GrantResolution> {
        let Some(permission) = self
            .permission_repository
            .find_permission_by_resource_action(resource, action)
            .await?
        else {
            return Ok(GrantResolution::UnknownPermission);
        };

        let roles = self.user_role_repository.list_user_roles(user_id).await?;
        for role in &roles {
            if self
                .role_permission_repository
                .role_has_permission(role.id(), permission.id())
                .await?
            {
                return Ok(GrantResolution::Granted(role.id()));
            }
        }

        Ok(GrantResolution::NotGranted)
    }
}

fn denied(user_id: UserId, resource: &PermissionResource, action: &PermissionAction) -> AppError {
    AppError::PermissionDenied(format!(
        "user '{user_id}' may not '{}' on '{}'",
        action.as_str(),
        resource.as_str()
    ))
}

#[cfg(test)]
mod tests;

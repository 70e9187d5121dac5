use async_trait::async_trait;
use rolegate_core::AppResult;
use rolegate_domain::{
    Permission, PermissionAction, PermissionId, PermissionResource, Role, RoleId,
    RolePermissionLink, UserId, UserRoleLink,
};

use crate::KeysetQuery;

use super::{CreateRoleInput, NewPermissionInput, PermissionFilter, UpdateRoleInput};

/// Repository port for role entities.
///
/// Soft-deleted roles are invisible to every read.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Creates a role. Fails with `AlreadyExists` when the name is taken.
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role>;

    /// Finds a live role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists live roles ordered by name, optionally filtered by a
    /// case-insensitive name substring.
    async fn list_roles(&self, name_filter: Option<&str>) -> AppResult<Vec<Role>>;

    /// Applies a partial update. Fails with `NotFound` for absent roles and
    /// `AlreadyExists` when the new name is taken.
    async fn update_role(&self, input: UpdateRoleInput) -> AppResult<Role>;

    /// Marks a role deleted. Fails with `NotFound` for absent roles.
    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()>;
}

/// Repository port for permission entities.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Creates a permission. Fails with `AlreadyExists` for a duplicate pair.
    async fn create_permission(&self, input: NewPermissionInput) -> AppResult<Permission>;

    /// Finds a permission by id.
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>>;

    /// Finds the permission identified by a (resource, action) pair.
    async fn find_permission_by_resource_action(
        &self,
        resource: &PermissionResource,
        action: &PermissionAction,
    ) -> AppResult<Option<Permission>>;

    /// Lists permissions ordered by resource then action.
    async fn list_permissions(&self, filter: &PermissionFilter) -> AppResult<Vec<Permission>>;

    /// Lists live roles carrying a permission, ordered by name.
    async fn list_roles_by_permission(&self, permission_id: PermissionId) -> AppResult<Vec<Role>>;
}

/// Repository port for user to role links.
#[async_trait]
pub trait UserRoleRepository: Send + Sync {
    /// Links a user to a live role.
    ///
    /// Fails with `AlreadyAssigned` for an existing link and `NotFound` when
    /// the role is absent.
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<UserRoleLink>;

    /// Removes a link. Fails with `NotAssigned` when no link existed.
    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()>;

    /// Lists the live roles held by a user, ordered by name.
    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Returns whether the user holds the role.
    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool>;

    /// Returns up to `query.fetch_limit()` user ids holding the role with an
    /// id strictly greater than `query.after`, in ascending id order.
    async fn list_role_users(
        &self,
        role_id: RoleId,
        query: &KeysetQuery<UserId>,
    ) -> AppResult<Vec<UserId>>;
}

/// Repository port for role to permission links.
#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    /// Links a permission to a live role.
    ///
    /// Fails with `AlreadyAssigned` for an existing link and `NotFound` when
    /// either side is absent.
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionLink>;

    /// Removes a link. Fails with `NotAssigned` when no link existed.
    async fn revoke_permission(&self, role_id: RoleId, permission_id: PermissionId)
    -> AppResult<()>;

    /// Lists the permissions linked to a role, ordered by resource then action.
    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>>;

    /// Returns whether the role carries the permission.
    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;
}

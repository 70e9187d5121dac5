use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use rolegate_application::{
    CreateRoleInput, KeysetQuery, NewPermissionInput, PermissionFilter, PermissionRepository,
    RolePermissionRepository, RoleRepository, UpdateRoleInput, UserRoleRepository,
};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    Permission, PermissionAction, PermissionId, PermissionResource, Role, RoleId,
    RolePermissionLink, UserId, UserRoleLink,
};
use tokio::sync::RwLock;

use crate::constraint_violation::{ViolationClass, ViolationMapping};

#[derive(Debug, Default)]
struct RbacTables {
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    user_roles: BTreeMap<(UserId, RoleId), UserRoleLink>,
    role_permissions: BTreeMap<(RoleId, PermissionId), RolePermissionLink>,
}

impl RbacTables {
    fn live_role(&self, role_id: RoleId) -> Option<&Role> {
        self.roles.get(&role_id).filter(|role| !role.is_deleted())
    }

    fn live_name_taken(&self, role: &Role, except: Option<RoleId>) -> bool {
        self.roles.values().any(|existing| {
            !existing.is_deleted()
                && Some(existing.id()) != except
                && existing.name() == role.name()
        })
    }

    fn live_roles_sorted(&self, role_ids: impl Iterator<Item = RoleId>) -> Vec<Role> {
        let mut roles: Vec<Role> = role_ids
            .filter_map(|role_id| self.live_role(role_id).cloned())
            .collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        roles
    }
}

fn sorted_permissions(mut permissions: Vec<Permission>) -> Vec<Permission> {
    permissions.sort_by(|left, right| left.sort_key().cmp(&right.sort_key()));
    permissions
}

/// In-memory implementation of every RBAC repository port.
///
/// Enforces the same uniqueness, reference and soft-delete rules as the
/// Postgres schema and reports violations through the same mapping.
#[derive(Debug, Default)]
pub struct InMemoryRbacStore {
    tables: RwLock<RbacTables>,
}

impl InMemoryRbacStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacStore {
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut tables = self.tables.write().await;
        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description,
            Utc::now(),
            None,
            None,
        );

        if tables.live_name_taken(&role, None) {
            return Err(ViolationMapping {
                unique: Some(AppError::AlreadyExists(format!(
                    "role '{}' already exists",
                    role.name().as_str()
                ))),
                foreign_key: None,
            }
            .resolve(
                Some(ViolationClass::Unique),
                "create role",
                "duplicate live role name",
            ));
        }

        tables.roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.tables.read().await.live_role(role_id).cloned())
    }

    async fn list_roles(&self, name_filter: Option<&str>) -> AppResult<Vec<Role>> {
        let needle = name_filter
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);
        let tables = self.tables.read().await;

        let matching = tables
            .roles
            .values()
            .filter(|role| {
                needle
                    .as_deref()
                    .is_none_or(|needle| role.name().as_str().contains(needle))
            })
            .map(Role::id)
            .collect::<Vec<_>>();

        Ok(tables.live_roles_sorted(matching.into_iter()))
    }

    async fn update_role(&self, input: UpdateRoleInput) -> AppResult<Role> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.live_role(input.role_id).cloned() else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                input.role_id
            )));
        };

        let updated = current.with_changes(input.name, input.description, Utc::now());
        if tables.live_name_taken(&updated, Some(updated.id())) {
            return Err(ViolationMapping {
                unique: Some(AppError::AlreadyExists(format!(
                    "role '{}' already exists",
                    updated.name().as_str()
                ))),
                foreign_key: None,
            }
            .resolve(
                Some(ViolationClass::Unique),
                "update role",
                "duplicate live role name",
            ));
        }

        tables.roles.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.live_role(role_id).cloned() else {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        };

        tables
            .roles
            .insert(role_id, current.into_deleted(Utc::now()));
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacStore {
    async fn create_permission(&self, input: NewPermissionInput) -> AppResult<Permission> {
        let mut tables = self.tables.write().await;
        if tables
            .permissions
            .values()
            .any(|permission| permission.matches(&input.resource, &input.action))
        {
            return Err(ViolationMapping {
                unique: Some(AppError::AlreadyExists(format!(
                    "permission '{}:{}' already exists",
                    input.resource.as_str(),
                    input.action.as_str()
                ))),
                foreign_key: None,
            }
            .resolve(
                Some(ViolationClass::Unique),
                "create permission",
                "duplicate resource and action",
            ));
        }

        let permission = Permission::new(PermissionId::new(), input.resource, input.action);
        tables
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(permission)
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .tables
            .read()
            .await
            .permissions
            .get(&permission_id)
            .cloned())
    }

    async fn find_permission_by_resource_action(
        &self,
        resource: &PermissionResource,
        action: &PermissionAction,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .tables
            .read()
            .await
            .permissions
            .values()
            .find(|permission| permission.matches(resource, action))
            .cloned())
    }

    async fn list_permissions(&self, filter: &PermissionFilter) -> AppResult<Vec<Permission>> {
        let tables = self.tables.read().await;
        let permissions = tables
            .permissions
            .values()
            .filter(|permission| filter.matches_text(permission))
            .filter(|permission| {
                filter.role_id.is_none_or(|role_id| {
                    tables
                        .role_permissions
                        .contains_key(&(role_id, permission.id()))
                })
            })
            .cloned()
            .collect();

        Ok(sorted_permissions(permissions))
    }

    async fn list_roles_by_permission(&self, permission_id: PermissionId) -> AppResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let role_ids = tables
            .role_permissions
            .keys()
            .filter(|(_, linked)| *linked == permission_id)
            .map(|(role_id, _)| *role_id)
            .collect::<Vec<_>>();

        Ok(tables.live_roles_sorted(role_ids.into_iter()))
    }
}

#[async_trait]
impl UserRoleRepository for InMemoryRbacStore {
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<UserRoleLink> {
        let mut tables = self.tables.write().await;
        let mapping = ViolationMapping {
            unique: Some(AppError::AlreadyAssigned(format!(
                "role '{role_id}' is already assigned to user '{user_id}'"
            ))),
            foreign_key: Some(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            ))),
        };

        if tables.live_role(role_id).is_none() {
            return Err(mapping.resolve(
                Some(ViolationClass::ForeignKey),
                "assign role to user",
                "role is absent or deleted",
            ));
        }
        if tables.user_roles.contains_key(&(user_id, role_id)) {
            return Err(mapping.resolve(
                Some(ViolationClass::Unique),
                "assign role to user",
                "link exists",
            ));
        }

        let link = UserRoleLink {
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
        };
        tables.user_roles.insert((user_id, role_id), link.clone());
        Ok(link)
    }

    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        match self
            .tables
            .write()
            .await
            .user_roles
            .remove(&(user_id, role_id))
        {
            Some(_) => Ok(()),
            None => Err(AppError::NotAssigned(format!(
                "role '{role_id}' is not assigned to user '{user_id}'"
            ))),
        }
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let tables = self.tables.read().await;
        let role_ids = tables
            .user_roles
            .range((user_id, RoleId::from_uuid(uuid::Uuid::nil()))..)
            .take_while(|((holder, _), _)| *holder == user_id)
            .map(|((_, role_id), _)| *role_id)
            .collect::<Vec<_>>();

        Ok(tables.live_roles_sorted(role_ids.into_iter()))
    }

    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.user_roles.contains_key(&(user_id, role_id))
            && tables.live_role(role_id).is_some())
    }

    async fn list_role_users(
        &self,
        role_id: RoleId,
        query: &KeysetQuery<UserId>,
    ) -> AppResult<Vec<UserId>> {
        let tables = self.tables.read().await;
        if tables.live_role(role_id).is_none() {
            return Ok(Vec::new());
        }

        let members: BTreeSet<UserId> = tables
            .user_roles
            .keys()
            .filter(|(_, linked)| *linked == role_id)
            .map(|(user_id, _)| *user_id)
            .filter(|user_id| query.after.is_none_or(|after| *user_id > after))
            .collect();

        Ok(members.into_iter().take(query.fetch_limit()).collect())
    }
}

#[async_trait]
impl RolePermissionRepository for InMemoryRbacStore {
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionLink> {
        let mut tables = self.tables.write().await;

        if tables.live_role(role_id).is_none() {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        let mapping = ViolationMapping {
            unique: Some(AppError::AlreadyAssigned(format!(
                "permission '{permission_id}' is already assigned to role '{role_id}'"
            ))),
            foreign_key: Some(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            ))),
        };
        if !tables.permissions.contains_key(&permission_id) {
            return Err(mapping.resolve(
                Some(ViolationClass::ForeignKey),
                "assign permission to role",
                "permission is absent",
            ));
        }
        if tables
            .role_permissions
            .contains_key(&(role_id, permission_id))
        {
            return Err(mapping.resolve(
                Some(ViolationClass::Unique),
                "assign permission to role",
                "link exists",
            ));
        }

        let link = RolePermissionLink {
            role_id,
            permission_id,
            assigned_at: Utc::now(),
        };
        tables
            .role_permissions
            .insert((role_id, permission_id), link.clone());
        Ok(link)
    }

    async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        match self
            .tables
            .write()
            .await
            .role_permissions
            .remove(&(role_id, permission_id))
        {
            Some(_) => Ok(()),
            None => Err(AppError::NotAssigned(format!(
                "permission '{permission_id}' is not assigned to role '{role_id}'"
            ))),
        }
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let tables = self.tables.read().await;
        let permissions = tables
            .role_permissions
            .keys()
            .filter(|(linked, _)| *linked == role_id)
            .filter_map(|(_, permission_id)| tables.permissions.get(permission_id).cloned())
            .collect();

        Ok(sorted_permissions(permissions))
    }

    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .role_permissions
            .contains_key(&(role_id, permission_id)))
    }
}

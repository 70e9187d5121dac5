use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    Permission, PermissionAction, PermissionId, PermissionResource, Role, RoleDescription, RoleId,
    RoleName, RolePermissionLink, UserId, UserRoleLink,
};
use tokio::sync::Mutex;

use crate::{
    AggregateCache, CreateRoleInput, KeysetQuery, NewPermissionInput, PermissionFilter,
    PermissionRepository, RolePermissionRepository, RoleRepository, UpdateRoleInput,
    UserRoleRepository,
};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FakeFailures {
    pub permission_lookup: bool,
    pub user_roles: bool,
    pub role_permission_check: bool,
    pub role_reads: bool,
}

#[derive(Default)]
struct FakeState {
    roles: BTreeMap<RoleId, Role>,
    permissions: BTreeMap<PermissionId, Permission>,
    user_roles: BTreeMap<(UserId, RoleId), UserRoleLink>,
    role_permissions: BTreeMap<(RoleId, PermissionId), RolePermissionLink>,
}

#[derive(Default)]
pub(crate) struct FakeRbacStore {
    state: Mutex<FakeState>,
    failures: Mutex<FakeFailures>,
    pub role_reads: AtomicUsize,
    pub role_permission_reads: AtomicUsize,
    pub user_role_reads: AtomicUsize,
    pub grant_checks: AtomicUsize,
}

pub(crate) fn role_fixture(name: &str) -> Role {
    let Ok(name) = RoleName::new(name) else {
        panic!("valid role name fixture");
    };
    Role::new(
        RoleId::new(),
        name,
        RoleDescription::default(),
        Utc::now(),
        None,
        None,
    )
}

pub(crate) fn permission_fixture(resource: &str, action: &str) -> Permission {
    let (Ok(resource), Ok(action)) = (
        PermissionResource::new(resource),
        PermissionAction::new(action),
    ) else {
        panic!("valid permission fixture");
    };
    Permission::new(PermissionId::new(), resource, action)
}

fn injected(operation: &str) -> AppError {
    AppError::Internal(format!("injected {operation} failure"))
}

impl FakeRbacStore {
    pub async fn fail(&self, failures: FakeFailures) {
        *self.failures.lock().await = failures;
    }

    pub async fn seed_role(&self, name: &str) -> Role {
        let role = role_fixture(name);
        self.state
            .lock()
            .await
            .roles
            .insert(role.id(), role.clone());
        role
    }

    pub async fn seed_permission(&self, resource: &str, action: &str) -> Permission {
        let permission = permission_fixture(resource, action);
        self.state
            .lock()
            .await
            .permissions
            .insert(permission.id(), permission.clone());
        permission
    }

    pub async fn link_user(&self, user_id: UserId, role_id: RoleId) {
        self.state.lock().await.user_roles.insert(
            (user_id, role_id),
            UserRoleLink {
                user_id,
                role_id,
                assigned_by: None,
                assigned_at: Utc::now(),
            },
        );
    }

    pub async fn link_permission(&self, role_id: RoleId, permission_id: PermissionId) {
        self.state.lock().await.role_permissions.insert(
            (role_id, permission_id),
            RolePermissionLink {
                role_id,
                permission_id,
                assigned_at: Utc::now(),
            },
        );
    }

    pub async fn rename_role_directly(&self, role_id: RoleId, name: &str) {
        let Ok(name) = RoleName::new(name) else {
            panic!("valid role name fixture");
        };
        let mut state = self.state.lock().await;
        if let Some(role) = state.roles.remove(&role_id) {
            state
                .roles
                .insert(role_id, role.with_changes(Some(name), None, Utc::now()));
        }
    }

    fn live_role(state: &FakeState, role_id: RoleId) -> Option<Role> {
        state
            .roles
            .get(&role_id)
            .filter(|role| !role.is_deleted())
            .cloned()
    }

    fn sorted_by_name(mut roles: Vec<Role>) -> Vec<Role> {
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        roles
    }

    fn sorted_permissions(mut permissions: Vec<Permission>) -> Vec<Permission> {
        permissions.sort_by(|left, right| left.sort_key().cmp(&right.sort_key()));
        permissions
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if state
            .roles
            .values()
            .any(|role| !role.is_deleted() && role.name() == &input.name)
        {
            return Err(AppError::AlreadyExists(format!(
                "role '{}' already exists",
                input.name.as_str()
            )));
        }

        let role = Role::new(
            RoleId::new(),
            input.name,
            input.description,
            Utc::now(),
            None,
            None,
        );
        state.roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        self.role_reads.fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().await.role_reads {
            return Err(injected("role read"));
        }
        Ok(Self::live_role(&*self.state.lock().await, role_id))
    }

    async fn list_roles(&self, name_filter: Option<&str>) -> AppResult<Vec<Role>> {
        let needle = name_filter.unwrap_or_default().to_lowercase();
        let roles = self
            .state
            .lock()
            .await
            .roles
            .values()
            .filter(|role| !role.is_deleted() && role.name().as_str().contains(&needle))
            .cloned()
            .collect();
        Ok(Self::sorted_by_name(roles))
    }

    async fn update_role(&self, input: UpdateRoleInput) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        let Some(role) = Self::live_role(&state, input.role_id) else {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                input.role_id
            )));
        };
        let updated = role.with_changes(input.name, input.description, Utc::now());
        state.roles.insert(updated.id(), updated.clone());
        Ok(updated)
    }

    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let Some(role) = Self::live_role(&state, role_id) else {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        };
        state.roles.insert(role_id, role.into_deleted(Utc::now()));
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for FakeRbacStore {
    async fn create_permission(&self, input: NewPermissionInput) -> AppResult<Permission> {
        let mut state = self.state.lock().await;
        if state
            .permissions
            .values()
            .any(|permission| permission.matches(&input.resource, &input.action))
        {
            return Err(AppError::AlreadyExists("permission already exists".to_owned()));
        }
        let permission = Permission::new(PermissionId::new(), input.resource, input.action);
        state
            .permissions
            .insert(permission.id(), permission.clone());
        Ok(permission)
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self
            .state
            .lock()
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
        if self.failures.lock().await.permission_lookup {
            return Err(injected("permission lookup"));
        }
        Ok(self
            .state
            .lock()
            .await
            .permissions
            .values()
            .find(|permission| permission.matches(resource, action))
            .cloned())
    }

    async fn list_permissions(&self, filter: &PermissionFilter) -> AppResult<Vec<Permission>> {
        let state = self.state.lock().await;
        let permissions = state
            .permissions
            .values()
            .filter(|permission| filter.matches_text(permission))
            .filter(|permission| {
                filter.role_id.is_none_or(|role_id| {
                    state
                        .role_permissions
                        .contains_key(&(role_id, permission.id()))
                })
            })
            .cloned()
            .collect();
        Ok(Self::sorted_permissions(permissions))
    }

    async fn list_roles_by_permission(&self, permission_id: PermissionId) -> AppResult<Vec<Role>> {
        let state = self.state.lock().await;
        let roles = state
            .role_permissions
            .keys()
            .filter(|(_, linked)| *linked == permission_id)
            .filter_map(|(role_id, _)| Self::live_role(&state, *role_id))
            .collect();
        Ok(Self::sorted_by_name(roles))
    }
}

#[async_trait]
impl UserRoleRepository for FakeRbacStore {
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<UserRoleLink> {
        let mut state = self.state.lock().await;
        if Self::live_role(&state, role_id).is_none() {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }
        if state.user_roles.contains_key(&(user_id, role_id)) {
            return Err(AppError::AlreadyAssigned(format!(
                "role '{role_id}' is already assigned to user '{user_id}'"
            )));
        }
        let link = UserRoleLink {
            user_id,
            role_id,
            assigned_by,
            assigned_at: Utc::now(),
        };
        state.user_roles.insert((user_id, role_id), link.clone());
        Ok(link)
    }

    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        match self.state.lock().await.user_roles.remove(&(user_id, role_id)) {
            Some(_) => Ok(()),
            None => Err(AppError::NotAssigned(format!(
                "role '{role_id}' is not assigned to user '{user_id}'"
            ))),
        }
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.user_role_reads.fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().await.user_roles {
            return Err(injected("user role listing"));
        }
        let state = self.state.lock().await;
        let roles = state
            .user_roles
            .keys()
            .filter(|(holder, _)| *holder == user_id)
            .filter_map(|(_, role_id)| Self::live_role(&state, *role_id))
            .collect();
        Ok(Self::sorted_by_name(roles))
    }

    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.user_roles.contains_key(&(user_id, role_id))
            && Self::live_role(&state, role_id).is_some())
    }

    async fn list_role_users(
        &self,
        role_id: RoleId,
        query: &KeysetQuery<UserId>,
    ) -> AppResult<Vec<UserId>> {
        Ok(self
            .state
            .lock()
            .await
            .user_roles
            .keys()
            .filter(|(_, linked)| *linked == role_id)
            .map(|(user_id, _)| *user_id)
            .filter(|user_id| query.after.is_none_or(|after| *user_id > after))
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .take(query.fetch_limit())
            .collect())
    }
}

#[async_trait]
impl RolePermissionRepository for FakeRbacStore {
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionLink> {
        let mut state = self.state.lock().await;
        if Self::live_role(&state, role_id).is_none()
            || !state.permissions.contains_key(&permission_id)
        {
            return Err(AppError::NotFound(
                "role or permission does not exist".to_owned(),
            ));
        }
        if state.role_permissions.contains_key(&(role_id, permission_id)) {
            return Err(AppError::AlreadyAssigned(
                "permission is already assigned to role".to_owned(),
            ));
        }
        let link = RolePermissionLink {
            role_id,
            permission_id,
            assigned_at: Utc::now(),
        };
        state
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
            .state
            .lock()
            .await
            .role_permissions
            .remove(&(role_id, permission_id))
        {
            Some(_) => Ok(()),
            None => Err(AppError::NotAssigned(
                "permission is not assigned to role".to_owned(),
            )),
        }
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        self.role_permission_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().await;
        let permissions = state
            .role_permissions
            .keys()
            .filter(|(linked, _)| *linked == role_id)
            .filter_map(|(_, permission_id)| state.permissions.get(permission_id).cloned())
            .collect();
        Ok(Self::sorted_permissions(permissions))
    }

    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        self.grant_checks.fetch_add(1, Ordering::SeqCst);
        if self.failures.lock().await.role_permission_check {
            return Err(injected("role permission check"));
        }
        Ok(self
            .state
            .lock()
            .await
            .role_permissions
            .contains_key(&(role_id, permission_id)))
    }
}

#[derive(Default)]
pub(crate) struct FakeAggregateCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Duration)>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub stall: AtomicBool,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl FakeAggregateCache {
    pub async fn entry(&self, key: &str) -> Option<(Vec<u8>, Duration)> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn insert_raw(&self, key: &str, value: Vec<u8>) {
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), (value, Duration::from_secs(60)));
    }

    async fn maybe_stall(&self) {
        if self.stall.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    }
}

#[async_trait]
impl AggregateCache for FakeAggregateCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.maybe_stall().await;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("cache read"));
        }
        Ok(self
            .entries
            .lock()
            .await
            .get(key)
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> AppResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.maybe_stall().await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("cache write"));
        }
        self.entries
            .lock()
            .await
            .insert(key.to_owned(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(injected("cache delete"));
        }
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

use std::sync::Arc;

use rolegate_core::AppResult;
use rolegate_domain::{Role, RoleId, UserId, UserRoleLink};
use tracing::info;

use crate::{KeysetPage, KeysetQuery, UserRoleRepository};

/// One page of users holding a role, keyed by user id.
pub type RoleUsersPage = KeysetPage<UserId, UserId>;

/// Grants, revokes and reads user role memberships.
#[derive(Clone)]
pub struct UserRoleService {
    repository: Arc<dyn UserRoleRepository>,
}

impl UserRoleService {
    /// Creates a user role service.
    #[must_use]
    pub fn new(repository: Arc<dyn UserRoleRepository>) -> Self {
        Self { repository }
    }

    /// Grants a role to a user.
    pub async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<UserRoleLink> {
        let link = self
            .repository
            .assign_role(user_id, role_id, assigned_by)
            .await?;
        info!(%user_id, %role_id, "role assigned to user");
        Ok(link)
    }

    /// Revokes a role from a user.
    pub async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.repository.revoke_role(user_id, role_id).await?;
        info!(%user_id, %role_id, "role revoked from user");
        Ok(())
    }

    /// Lists the live roles held by a user, ordered by name.
    pub async fn get_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.repository.list_user_roles(user_id).await
    }

    /// Returns whether the user holds the role.
    pub async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        self.repository.user_has_role(user_id, role_id).await
    }

    /// Returns one page of the users holding a role.
    ///
    /// Passing the returned `next_cursor` back yields the following page;
    /// walking every page visits each member exactly once.
    pub async fn get_role_users(
        &self,
        role_id: RoleId,
        limit: usize,
        cursor: Option<UserId>,
    ) -> AppResult<RoleUsersPage> {
        let query = KeysetQuery::new(cursor, limit)?;
        let rows = self.repository.list_role_users(role_id, &query).await?;
        Ok(KeysetPage::from_overfetched(rows, query.limit, |user_id| {
            *user_id
        }))
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_application::{KeysetQuery, UserRoleRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Role, RoleId, UserId, UserRoleLink};
use sqlx::FromRow;
use uuid::Uuid;

use crate::PgPools;
use crate::constraint_violation::ViolationMapping;
use crate::postgres_rows::{ROLE_COLUMNS, RoleRow, into_roles};

/// PostgreSQL-backed user role link repository.
#[derive(Clone)]
pub struct PostgresUserRoleRepository {
    pools: PgPools,
}

impl PostgresUserRoleRepository {
    /// Creates a repository over the shared pools.
    #[must_use]
    pub fn new(pools: PgPools) -> Self {
        Self { pools }
    }
}

#[derive(Debug, FromRow)]
struct UserRoleRow {
    user_id: Uuid,
    role_id: Uuid,
    assigned_by: Option<Uuid>,
    assigned_at: DateTime<Utc>,
}

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' does not exist"))
}

#[async_trait]
impl UserRoleRepository for PostgresUserRoleRepository {
    async fn assign_role(
        &self,
        user_id: UserId,
        role_id: RoleId,
        assigned_by: Option<UserId>,
    ) -> AppResult<UserRoleLink> {
        let row = sqlx::query_as::<_, UserRoleRow>(
            r#"
            INSERT INTO user_roles (user_id, role_id, assigned_by)
            SELECT $1::uuid, roles.id, $3::uuid
            FROM roles
            WHERE roles.id = $2 AND roles.deleted_at IS NULL
            RETURNING user_id, role_id, assigned_by, assigned_at
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .bind(assigned_by.map(|assigner| assigner.as_uuid()))
        .fetch_optional(self.pools.write())
        .await
        .map_err(|error| {
            ViolationMapping {
                unique: Some(AppError::AlreadyAssigned(format!(
                    "role '{role_id}' is already assigned to user '{user_id}'"
                ))),
                foreign_key: Some(role_not_found(role_id)),
            }
            .translate(error, "assign role to user")
        })?;

        let Some(row) = row else {
            return Err(role_not_found(role_id));
        };

        Ok(UserRoleLink {
            user_id: UserId::from_uuid(row.user_id),
            role_id: RoleId::from_uuid(row.role_id),
            assigned_by: row.assigned_by.map(UserId::from_uuid),
            assigned_at: row.assigned_at,
        })
    }

    async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(self.pools.write())
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke role from user: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotAssigned(format!(
                "role '{role_id}' is not assigned to user '{user_id}'"
            )));
        }

        Ok(())
    }

    async fn list_user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles
            JOIN user_roles ON user_roles.role_id = roles.id
            WHERE user_roles.user_id = $1
              AND roles.deleted_at IS NULL
            ORDER BY roles.name
            "#
        ))
        .bind(user_id.as_uuid())
        .fetch_all(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        into_roles(rows)
    }

    async fn user_has_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles
                JOIN roles ON roles.id = user_roles.role_id
                WHERE user_roles.user_id = $1
                  AND user_roles.role_id = $2
                  AND roles.deleted_at IS NULL
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_one(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to check user role: {error}")))
    }

    async fn list_role_users(
        &self,
        role_id: RoleId,
        query: &KeysetQuery<UserId>,
    ) -> AppResult<Vec<UserId>> {
        let fetch_limit = i64::try_from(query.fetch_limit())
            .map_err(|_| AppError::Validation("page limit is too large".to_owned()))?;

        let user_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_roles.user_id
            FROM user_roles
            JOIN roles ON roles.id = user_roles.role_id AND roles.deleted_at IS NULL
            WHERE user_roles.role_id = $1
              AND ($2::uuid IS NULL OR user_roles.user_id > $2)
            ORDER BY user_roles.user_id
            LIMIT $3
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(query.after.map(|after| after.as_uuid()))
        .bind(fetch_limit)
        .fetch_all(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role users: {error}")))?;

        Ok(user_ids.into_iter().map(UserId::from_uuid).collect())
    }
}

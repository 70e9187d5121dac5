use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rolegate_application::RolePermissionRepository;
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Permission, PermissionId, RoleId, RolePermissionLink};
use sqlx::FromRow;
use uuid::Uuid;

use crate::PgPools;
use crate::constraint_violation::ViolationMapping;
use crate::postgres_rows::{PermissionRow, into_permissions};

/// PostgreSQL-backed role permission link repository.
#[derive(Clone)]
pub struct PostgresRolePermissionRepository {
    pools: PgPools,
}

impl PostgresRolePermissionRepository {
    /// Creates a repository over the shared pools.
    #[must_use]
    pub fn new(pools: PgPools) -> Self {
        Self { pools }
    }
}

#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: Uuid,
    permission_id: Uuid,
    assigned_at: DateTime<Utc>,
}

#[async_trait]
impl RolePermissionRepository for PostgresRolePermissionRepository {
    async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionLink> {
        let row = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT roles.id, $2::uuid
            FROM roles
            WHERE roles.id = $1 AND roles.deleted_at IS NULL
            RETURNING role_id, permission_id, assigned_at
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .fetch_optional(self.pools.write())
        .await
        .map_err(|error| {
            ViolationMapping {
                unique: Some(AppError::AlreadyAssigned(format!(
                    "permission '{permission_id}' is already assigned to role '{role_id}'"
                ))),
                foreign_key: Some(AppError::NotFound(format!(
                    "permission '{permission_id}' does not exist"
                ))),
            }
            .translate(error, "assign permission to role")
        })?;

        let Some(row) = row else {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        };

        Ok(RolePermissionLink {
            role_id: RoleId::from_uuid(row.role_id),
            permission_id: PermissionId::from_uuid(row.permission_id),
            assigned_at: row.assigned_at,
        })
    }

    async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM role_permissions
            WHERE role_id = $1 AND permission_id = $2
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(self.pools.write())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to revoke permission from role: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotAssigned(format!(
                "permission '{permission_id}' is not assigned to role '{role_id}'"
            )));
        }

        Ok(())
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permissions.id, permissions.resource, permissions.action
            FROM permissions
            JOIN role_permissions ON role_permissions.permission_id = permissions.id
            WHERE role_permissions.role_id = $1
            ORDER BY permissions.resource, permissions.action
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_all(self.pools.read())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        into_permissions(rows)
    }

    async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM role_permissions
                WHERE role_id = $1 AND permission_id = $2
            )
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .fetch_one(self.pools.read())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to check role permission: {error}"))
        })
    }
}

use async_trait::async_trait;
use rolegate_application::{NewPermissionInput, PermissionFilter, PermissionRepository};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Permission, PermissionAction, PermissionId, PermissionResource, Role};
use uuid::Uuid;

use crate::PgPools;
use crate::constraint_violation::ViolationMapping;
use crate::postgres_rows::{
    PermissionRow, ROLE_COLUMNS, RoleRow, into_permissions, into_roles, text_filter,
};

/// PostgreSQL-backed permission repository.
#[derive(Clone)]
pub struct PostgresPermissionRepository {
    pools: PgPools,
}

impl PostgresPermissionRepository {
    /// Creates a repository over the shared pools.
    #[must_use]
    pub fn new(pools: PgPools) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn create_permission(&self, input: NewPermissionInput) -> AppResult<Permission> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            INSERT INTO permissions (id, resource, action)
            VALUES ($1, $2, $3)
            RETURNING id, resource, action
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.resource.as_str())
        .bind(input.action.as_str())
        .fetch_one(self.pools.write())
        .await
        .map_err(|error| {
            ViolationMapping {
                unique: Some(AppError::AlreadyExists(format!(
                    "permission '{}:{}' already exists",
                    input.resource.as_str(),
                    input.action.as_str()
                ))),
                foreign_key: None,
            }
            .translate(error, "create permission")
        })?;

        row.into_permission()
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource, action
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_optional(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?;

        row.map(PermissionRow::into_permission).transpose()
    }

    async fn find_permission_by_resource_action(
        &self,
        resource: &PermissionResource,
        action: &PermissionAction,
    ) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource, action
            FROM permissions
            WHERE resource = $1 AND action = $2
            "#,
        )
        .bind(resource.as_str())
        .bind(action.as_str())
        .fetch_optional(self.pools.read())
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find permission by resource and action: {error}"
            ))
        })?;

        row.map(PermissionRow::into_permission).transpose()
    }

    async fn list_permissions(&self, filter: &PermissionFilter) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT permissions.id, permissions.resource, permissions.action
            FROM permissions
            WHERE ($1::uuid IS NULL OR EXISTS (
                    SELECT 1
                    FROM role_permissions
                    WHERE role_permissions.permission_id = permissions.id
                      AND role_permissions.role_id = $1
                ))
              AND ($2::text IS NULL OR permissions.resource ILIKE $2)
              AND ($3::text IS NULL OR permissions.action ILIKE $3)
            ORDER BY permissions.resource, permissions.action
            "#,
        )
        .bind(filter.role_id.map(|role_id| role_id.as_uuid()))
        .bind(text_filter(filter.resource.as_deref()))
        .bind(text_filter(filter.action.as_deref()))
        .fetch_all(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        into_permissions(rows)
    }

    async fn list_roles_by_permission(&self, permission_id: PermissionId) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles
            JOIN role_permissions ON role_permissions.role_id = roles.id
            WHERE role_permissions.permission_id = $1
              AND roles.deleted_at IS NULL
            ORDER BY roles.name
            "#
        ))
        .bind(permission_id.as_uuid())
        .fetch_all(self.pools.read())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list roles by permission: {error}"))
        })?;

        into_roles(rows)
    }
}

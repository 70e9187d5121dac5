use async_trait::async_trait;
use rolegate_application::{CreateRoleInput, RoleRepository, UpdateRoleInput};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{Role, RoleId};
use uuid::Uuid;

use crate::PgPools;
use crate::constraint_violation::ViolationMapping;
use crate::postgres_rows::{ROLE_COLUMNS, RoleRow, into_roles, text_filter};

/// PostgreSQL-backed role repository.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pools: PgPools,
}

impl PostgresRoleRepository {
    /// Creates a repository over the shared pools.
    #[must_use]
    pub fn new(pools: PgPools) -> Self {
        Self { pools }
    }
}

fn name_taken(name: &str) -> ViolationMapping {
    ViolationMapping {
        unique: Some(AppError::AlreadyExists(format!(
            "role '{name}' already exists"
        ))),
        foreign_key: None,
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            INSERT INTO roles (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.name.as_str())
        .bind(input.description.as_str())
        .fetch_one(self.pools.write())
        .await
        .map_err(|error| name_taken(input.name.as_str()).translate(error, "create role"))?;

        row.into_role()
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles
            WHERE roles.id = $1 AND roles.deleted_at IS NULL
            "#
        ))
        .bind(role_id.as_uuid())
        .fetch_optional(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        row.map(RoleRow::into_role).transpose()
    }

    async fn list_roles(&self, name_filter: Option<&str>) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles
            WHERE roles.deleted_at IS NULL
              AND ($1::text IS NULL OR roles.name ILIKE $1)
            ORDER BY roles.name
            "#
        ))
        .bind(text_filter(name_filter))
        .fetch_all(self.pools.read())
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        into_roles(rows)
    }

    async fn update_role(&self, input: UpdateRoleInput) -> AppResult<Role> {
        let attempted_name = input
            .name
            .as_ref()
            .map(|name| name.as_str().to_owned())
            .unwrap_or_default();

        let row = sqlx::query_as::<_, RoleRow>(&format!(
            r#"
            UPDATE roles
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {ROLE_COLUMNS}
            "#
        ))
        .bind(input.role_id.as_uuid())
        .bind(input.name.as_ref().map(|name| name.as_str()))
        .bind(input.description.as_ref().map(|description| description.as_str()))
        .fetch_optional(self.pools.write())
        .await
        .map_err(|error| name_taken(&attempted_name).translate(error, "update role"))?;

        match row {
            Some(row) => row.into_role(),
            None => Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                input.role_id
            ))),
        }
    }

    async fn soft_delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(self.pools.write())
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' does not exist"
            )));
        }

        Ok(())
    }
}

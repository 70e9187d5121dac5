use chrono::{DateTime, Utc};
use rolegate_core::AppResult;
use rolegate_domain::{
    Permission, PermissionAction, PermissionId, PermissionResource, Role, RoleDescription, RoleId,
    RoleName,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Column list matching [`RoleRow`], qualified with the `roles` table name.
pub(crate) const ROLE_COLUMNS: &str = concat!(
    "roles.id, roles.name, roles.description, ",
    "roles.created_at, roles.updated_at, roles.deleted_at"
);

#[derive(Debug, FromRow)]
pub(crate) struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RoleRow {
    pub(crate) fn into_role(self) -> AppResult<Role> {
        Ok(Role::new(
            RoleId::from_uuid(self.id),
            RoleName::new(self.name)?,
            RoleDescription::new(self.description)?,
            self.created_at,
            self.updated_at,
            self.deleted_at,
        ))
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionRow {
    pub id: Uuid,
    pub resource: String,
    pub action: String,
}

impl PermissionRow {
    pub(crate) fn into_permission(self) -> AppResult<Permission> {
        Ok(Permission::new(
            PermissionId::from_uuid(self.id),
            PermissionResource::new(self.resource)?,
            PermissionAction::new(self.action)?,
        ))
    }
}

pub(crate) fn into_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    rows.into_iter().map(RoleRow::into_role).collect()
}

pub(crate) fn into_permissions(rows: Vec<PermissionRow>) -> AppResult<Vec<Permission>> {
    rows.into_iter().map(PermissionRow::into_permission).collect()
}

/// Builds an `ILIKE` pattern matching `value` as a literal substring.
pub(crate) fn substring_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Trims an optional text filter, dropping it when empty.
pub(crate) fn text_filter(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(substring_pattern)
}

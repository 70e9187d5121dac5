use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PermissionResponse;

mod conversions;

/// Page size used when the caller does not pass `limit`.
pub const DEFAULT_ROLE_USERS_PAGE_LIMIT: usize = 10;
/// Largest accepted `limit` for role membership pages.
pub const MAX_ROLE_USERS_PAGE_LIMIT: usize = 100;

/// Incoming payload for role creation.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Incoming payload for a partial role update.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query string for role listing.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListQuery {
    pub name: Option<String>,
}

/// Query string for role membership pages.
#[derive(Debug, Default, Deserialize)]
pub struct RoleUsersQuery {
    pub limit: Option<usize>,
    pub cursor: Option<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// API representation of a role with its resolved permissions.
#[derive(Debug, Serialize)]
pub struct EnrichedRoleResponse {
    #[serde(flatten)]
    pub role: RoleResponse,
    pub permissions: Vec<PermissionResponse>,
}

/// API representation of a role-permission link.
#[derive(Debug, Serialize)]
pub struct RolePermissionLinkResponse {
    pub role_id: String,
    pub permission_id: String,
    pub assigned_at: DateTime<Utc>,
}

/// One page of users holding a role.
#[derive(Debug, Serialize)]
pub struct RoleUsersPageResponse {
    pub user_ids: Vec<String>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

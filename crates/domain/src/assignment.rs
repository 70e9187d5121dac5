use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PermissionId, RoleId, UserId};

/// Link granting a role to a user. Unique on (user, role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoleLink {
    /// User holding the role.
    pub user_id: UserId,
    /// Granted role.
    pub role_id: RoleId,
    /// User who performed the assignment, if known.
    pub assigned_by: Option<UserId>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Link granting a permission to a role. Unique on (role, permission).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionLink {
    /// Role carrying the permission.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

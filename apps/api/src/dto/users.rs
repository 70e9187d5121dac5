use chrono::{DateTime, Utc};
use rolegate_core::AppResult;
use rolegate_domain::{UserId, UserRoleLink};
use serde::{Deserialize, Serialize};

/// Query string for role assignment.
#[derive(Debug, Default, Deserialize)]
pub struct AssignRoleQuery {
    pub assigned_by: Option<String>,
}

impl AssignRoleQuery {
    pub fn assigned_by(&self) -> AppResult<Option<UserId>> {
        self.assigned_by
            .as_deref()
            .map(str::parse::<UserId>)
            .transpose()
    }
}

/// API representation of a user-role link.
#[derive(Debug, Serialize)]
pub struct UserRoleLinkResponse {
    pub user_id: String,
    pub role_id: String,
    pub assigned_by: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

impl From<UserRoleLink> for UserRoleLinkResponse {
    fn from(value: UserRoleLink) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            role_id: value.role_id.to_string(),
            assigned_by: value.assigned_by.map(|user_id| user_id.to_string()),
            assigned_at: value.assigned_at,
        }
    }
}

use rolegate_core::AppResult;
use rolegate_domain::{PermissionAction, PermissionResource, UserId};
use serde::Deserialize;

/// Incoming payload for a permission check.
#[derive(Debug, Deserialize)]
pub struct AuthzCheckRequest {
    pub user_id: String,
    pub resource: String,
    pub action: String,
}

impl AuthzCheckRequest {
    pub fn into_parts(self) -> AppResult<(UserId, PermissionResource, PermissionAction)> {
        Ok((
            self.user_id.parse::<UserId>()?,
            PermissionResource::new(self.resource)?,
            PermissionAction::new(self.action)?,
        ))
    }
}

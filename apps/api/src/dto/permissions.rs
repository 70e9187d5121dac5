use serde::{Deserialize, Serialize};

mod conversions;

/// Incoming payload for permission creation.
#[derive(Debug, Deserialize)]
pub struct CreatePermissionRequest {
    pub resource: String,
    pub action: String,
}

/// Query string for permission listing.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionListQuery {
    pub role_id: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub resource: String,
    pub action: String,
}

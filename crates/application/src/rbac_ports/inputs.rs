use rolegate_domain::{
    Permission, PermissionAction, PermissionResource, RoleDescription, RoleId, RoleName,
};

/// Input payload for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Normalized role name.
    pub name: RoleName,
    /// Role description.
    pub description: RoleDescription,
}

/// Partial role update. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Role to update.
    pub role_id: RoleId,
    /// Replacement name.
    pub name: Option<RoleName>,
    /// Replacement description.
    pub description: Option<RoleDescription>,
}

impl UpdateRoleInput {
    /// Returns whether the update carries no field changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Input payload for permission creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermissionInput {
    /// Resource half of the pair.
    pub resource: PermissionResource,
    /// Action half of the pair.
    pub action: PermissionAction,
}

/// Permission list filter. Text filters are case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionFilter {
    /// Restricts results to permissions granted to this role.
    pub role_id: Option<RoleId>,
    /// Resource substring.
    pub resource: Option<String>,
    /// Action substring.
    pub action: Option<String>,
}

impl PermissionFilter {
    /// Returns whether a permission passes the resource and action filters.
    ///
    /// The role filter needs link data and is applied by the store.
    #[must_use]
    pub fn matches_text(&self, permission: &Permission) -> bool {
        contains_ignore_case(permission.resource().as_str(), self.resource.as_deref())
            && contains_ignore_case(permission.action().as_str(), self.action.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle.map(str::trim) {
        None | Some("") => true,
        Some(needle) => haystack
            .to_lowercase()
            .contains(needle.to_lowercase().as_str()),
    }
}

use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionAction, PermissionResource, Role, RoleId};

/// A role paired with its resolved permission list.
///
/// Never persisted on its own: it is recomputed from the entity store
/// whenever the aggregate cache has no usable copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRole {
    role: Role,
    permissions: Vec<Permission>,
}

impl EnrichedRole {
    /// Assembles the aggregate, ordering permissions by resource then action.
    #[must_use]
    pub fn new(role: Role, mut permissions: Vec<Permission>) -> Self {
        permissions.sort_by(|left, right| left.sort_key().cmp(&right.sort_key()));
        Self { role, permissions }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role.id()
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Returns the ordered permission list.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_slice()
    }

    /// Returns whether the role carries the (resource, action) pair.
    #[must_use]
    pub fn grants(&self, resource: &PermissionResource, action: &PermissionAction) -> bool {
        self.permissions
            .iter()
            .any(|permission| permission.matches(resource, action))
    }

    /// Splits the aggregate into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Role, Vec<Permission>) {
        (self.role, self.permissions)
    }
}

//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;
mod enriched_role;
mod identifiers;
mod permission;
mod role;

pub use assignment::{RolePermissionLink, UserRoleLink};
pub use enriched_role::EnrichedRole;
pub use identifiers::{PermissionId, RoleId, UserId};
pub use permission::{
    PERMISSION_ACTION_MAX_LENGTH, PERMISSION_RESOURCE_MAX_LENGTH, Permission, PermissionAction,
    PermissionResource,
};
pub use role::{
    ROLE_DESCRIPTION_MAX_LENGTH, ROLE_NAME_MAX_LENGTH, ROLE_NAME_MIN_LENGTH, Role,
    RoleDescription, RoleName,
};

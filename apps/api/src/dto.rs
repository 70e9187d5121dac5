mod authz;
mod health;
mod permissions;
mod roles;
mod users;

pub use authz::AuthzCheckRequest;
pub use health::{HealthDependencyStatus, HealthResponse};
pub use permissions::{CreatePermissionRequest, PermissionListQuery, PermissionResponse};
pub use roles::{
    CreateRoleRequest, EnrichedRoleResponse, RoleListQuery, RolePermissionLinkResponse,
    RoleResponse, RoleUsersPageResponse, RoleUsersQuery, UpdateRoleRequest,
};
pub use users::{AssignRoleQuery, UserRoleLinkResponse};

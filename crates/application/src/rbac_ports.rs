mod cache;
mod inputs;
mod repositories;

pub use cache::AggregateCache;
pub use inputs::{CreateRoleInput, NewPermissionInput, PermissionFilter, UpdateRoleInput};
pub use repositories::{
    PermissionRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};

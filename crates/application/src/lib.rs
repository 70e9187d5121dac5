//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod keyset;
mod permission_service;
mod rbac_ports;
mod role_enrichment_service;
mod role_permission_service;
mod role_service;
mod user_provisioning_service;
mod user_role_service;

#[cfg(test)]
mod test_fakes;

pub use authorization_service::AuthorizationService;
pub use keyset::{KeysetPage, KeysetQuery};
pub use permission_service::PermissionService;
pub use rbac_ports::{
    AggregateCache, CreateRoleInput, NewPermissionInput, PermissionFilter, PermissionRepository,
    RolePermissionRepository, RoleRepository, UpdateRoleInput, UserRoleRepository,
};
pub use role_enrichment_service::{
    ENRICHED_ROLE_CACHE_KEY_PREFIX, EnrichedRoleCacheSettings, RoleEnrichmentService,
};
pub use role_permission_service::RolePermissionService;
pub use role_service::RoleService;
pub use user_provisioning_service::{
    ProvisioningOutcome, UserCreatedEvent, UserProvisioningService,
};
pub use user_role_service::{RoleUsersPage, UserRoleService};

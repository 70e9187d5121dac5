use rolegate_application::{CreateRoleInput, RoleUsersPage, UpdateRoleInput};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{
    EnrichedRole, Role, RoleDescription, RoleId, RoleName, RolePermissionLink, UserId,
};

use super::{
    CreateRoleRequest, DEFAULT_ROLE_USERS_PAGE_LIMIT, EnrichedRoleResponse,
    MAX_ROLE_USERS_PAGE_LIMIT, RolePermissionLinkResponse, RoleResponse, RoleUsersPageResponse,
    RoleUsersQuery, UpdateRoleRequest,
};
use crate::dto::PermissionResponse;

impl CreateRoleRequest {
    pub fn into_input(self) -> AppResult<CreateRoleInput> {
        Ok(CreateRoleInput {
            name: RoleName::new(self.name)?,
            description: RoleDescription::new(self.description)?,
        })
    }
}

impl UpdateRoleRequest {
    pub fn into_input(self, role_id: RoleId) -> AppResult<UpdateRoleInput> {
        Ok(UpdateRoleInput {
            role_id,
            name: self.name.map(RoleName::new).transpose()?,
            description: self.description.map(RoleDescription::new).transpose()?,
        })
    }
}

impl RoleUsersQuery {
    /// Resolves the page size and decoded cursor.
    ///
    /// A zero limit is passed through so the pagination layer rejects it.
    pub fn page_request(&self) -> AppResult<(usize, Option<UserId>)> {
        let limit = self.limit.unwrap_or(DEFAULT_ROLE_USERS_PAGE_LIMIT);
        if limit > MAX_ROLE_USERS_PAGE_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be at most {MAX_ROLE_USERS_PAGE_LIMIT}, got {limit}"
            )));
        }

        let cursor = self
            .cursor
            .as_deref()
            .map(str::trim)
            .filter(|cursor| !cursor.is_empty())
            .map(str::parse::<UserId>)
            .transpose()?;

        Ok((limit, cursor))
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            description: value.description().as_str().to_owned(),
            created_at: value.created_at(),
            updated_at: value.updated_at(),
        }
    }
}

impl From<EnrichedRole> for EnrichedRoleResponse {
    fn from(value: EnrichedRole) -> Self {
        let (role, permissions) = value.into_parts();
        Self {
            role: RoleResponse::from(role),
            permissions: permissions
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        }
    }
}

impl From<RolePermissionLink> for RolePermissionLinkResponse {
    fn from(value: RolePermissionLink) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            permission_id: value.permission_id.to_string(),
            assigned_at: value.assigned_at,
        }
    }
}

impl From<RoleUsersPage> for RoleUsersPageResponse {
    fn from(value: RoleUsersPage) -> Self {
        let has_more = value.has_more();
        Self {
            user_ids: value.items.iter().map(ToString::to_string).collect(),
            next_cursor: value.next_cursor.map(|cursor| cursor.to_string()),
            has_more,
        }
    }
}

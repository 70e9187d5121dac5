use rolegate_application::{NewPermissionInput, PermissionFilter};
use rolegate_core::AppResult;
use rolegate_domain::{Permission, PermissionAction, PermissionResource, RoleId};

use super::{CreatePermissionRequest, PermissionListQuery, PermissionResponse};

impl CreatePermissionRequest {
    pub fn into_input(self) -> AppResult<NewPermissionInput> {
        Ok(NewPermissionInput {
            resource: PermissionResource::new(self.resource)?,
            action: PermissionAction::new(self.action)?,
        })
    }
}

impl PermissionListQuery {
    pub fn into_filter(self) -> AppResult<PermissionFilter> {
        let role_id = self
            .role_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::parse::<RoleId>)
            .transpose()?;

        Ok(PermissionFilter {
            role_id,
            resource: self.resource,
            action: self.action,
        })
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission_id: value.id().to_string(),
            resource: value.resource().as_str().to_owned(),
            action: value.action().as_str().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rolegate_core::AppError;
    use rolegate_domain::RoleId;

    use super::{CreatePermissionRequest, PermissionListQuery};

    #[test]
    fn list_query_parses_role_filter() {
        let role_id = RoleId::new();
        let query = PermissionListQuery {
            role_id: Some(role_id.to_string()),
            resource: Some("user".to_owned()),
            action: None,
        };

        let Ok(filter) = query.into_filter() else {
            panic!("filter should parse");
        };
        assert_eq!(filter.role_id, Some(role_id));
        assert_eq!(filter.resource.as_deref(), Some("user"));
    }

    #[test]
    fn list_query_rejects_malformed_role_filter() {
        let query = PermissionListQuery {
            role_id: Some("admin".to_owned()),
            ..PermissionListQuery::default()
        };
        assert!(matches!(query.into_filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn create_request_rejects_blank_action() {
        let request = CreatePermissionRequest {
            resource: "users".to_owned(),
            action: " ".to_owned(),
        };
        assert!(matches!(request.into_input(), Err(AppError::Validation(_))));
    }
}

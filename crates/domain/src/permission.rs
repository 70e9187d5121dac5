//! Permission entity: an atomic (resource, action) capability.

use rolegate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::PermissionId;

/// Maximum number of characters in a permission resource.
pub const PERMISSION_RESOURCE_MAX_LENGTH: usize = 100;
/// Maximum number of characters in a permission action.
pub const PERMISSION_ACTION_MAX_LENGTH: usize = 50;

/// Resource half of a permission, for example `users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionResource(String);

impl PermissionResource {
    /// Creates a trimmed resource name of 1 to 100 characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        bounded_token(value.into(), "permission resource", PERMISSION_RESOURCE_MAX_LENGTH)
            .map(Self)
    }

    /// Returns the resource name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PermissionResource {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionResource> for String {
    fn from(value: PermissionResource) -> Self {
        value.0
    }
}

/// Action half of a permission, for example `read`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionAction(String);

impl PermissionAction {
    /// Creates a trimmed action name of 1 to 50 characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        bounded_token(value.into(), "permission action", PERMISSION_ACTION_MAX_LENGTH).map(Self)
    }

    /// Returns the action name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PermissionAction {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionAction> for String {
    fn from(value: PermissionAction) -> Self {
        value.0
    }
}

/// Immutable (resource, action) capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    resource: PermissionResource,
    action: PermissionAction,
}

impl Permission {
    /// Creates a permission from persisted values.
    #[must_use]
    pub fn new(id: PermissionId, resource: PermissionResource, action: PermissionAction) -> Self {
        Self {
            id,
            resource,
            action,
        }
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the resource.
    #[must_use]
    pub fn resource(&self) -> &PermissionResource {
        &self.resource
    }

    /// Returns the action.
    #[must_use]
    pub fn action(&self) -> &PermissionAction {
        &self.action
    }

    /// Returns whether this permission is the given (resource, action) pair.
    #[must_use]
    pub fn matches(&self, resource: &PermissionResource, action: &PermissionAction) -> bool {
        &self.resource == resource && &self.action == action
    }

    /// Ordering key used wherever permission lists are returned.
    #[must_use]
    pub fn sort_key(&self) -> (&str, &str) {
        (self.resource.as_str(), self.action.as_str())
    }
}

fn bounded_token(value: String, label: &str, max_length: usize) -> AppResult<String> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();

    if length == 0 {
        return Err(AppError::Validation(format!("{label} must not be empty")));
    }

    if length > max_length {
        return Err(AppError::Validation(format!(
            "{label} must be at most {max_length} characters, got {length}"
        )));
    }

    Ok(trimmed.to_owned())
}

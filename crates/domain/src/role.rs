//! Role entity and its validated value types.

use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::RoleId;

/// Minimum number of characters in a role name.
pub const ROLE_NAME_MIN_LENGTH: usize = 2;
/// Maximum number of characters in a role name.
pub const ROLE_NAME_MAX_LENGTH: usize = 50;
/// Maximum number of characters in a role description.
pub const ROLE_DESCRIPTION_MAX_LENGTH: usize = 500;

/// Case-normalized role name.
///
/// Names are trimmed and lower-cased on construction so that uniqueness is
/// enforced on the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Creates a normalized role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let normalized = value.into().trim().to_lowercase();
        let length = normalized.chars().count();

        if !(ROLE_NAME_MIN_LENGTH..=ROLE_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "role name must be between {ROLE_NAME_MIN_LENGTH} and {ROLE_NAME_MAX_LENGTH} characters, got {length}"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Free-form role description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleDescription(String);

impl RoleDescription {
    /// Creates a description bounded by [`ROLE_DESCRIPTION_MAX_LENGTH`].
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let length = value.chars().count();

        if length > ROLE_DESCRIPTION_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role description must be at most {ROLE_DESCRIPTION_MAX_LENGTH} characters, got {length}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the description text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleDescription {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleDescription> for String {
    fn from(value: RoleDescription) -> Self {
        value.0
    }
}

/// Named collection of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: RoleName,
    description: RoleDescription,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Creates a role from persisted or freshly created values.
    #[must_use]
    pub fn new(
        id: RoleId,
        name: RoleName,
        description: RoleDescription,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the normalized role name.
    #[must_use]
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the role description.
    #[must_use]
    pub fn description(&self) -> &RoleDescription {
        &self.description
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp, if the role was ever updated.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the soft-deletion timestamp.
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the role was soft-deleted and must be hidden from reads.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies a partial update, leaving unspecified fields untouched.
    #[must_use]
    pub fn with_changes(
        mut self,
        name: Option<RoleName>,
        description: Option<RoleDescription>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        self.updated_at = Some(updated_at);
        self
    }

    /// Marks the role as soft-deleted.
    #[must_use]
    pub fn into_deleted(mut self, deleted_at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(deleted_at);
        self
    }
}

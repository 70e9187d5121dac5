//! Translation of integrity-constraint violations into application errors.
//!
//! Stores report violations by class only. Each write operation supplies a
//! [`ViolationMapping`] stating what a violation of each class means for it;
//! classes the mapping leaves open fall through to `Internal`.

use std::fmt::Display;

use rolegate_core::AppError;
use tracing::debug;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Class of integrity constraint a write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViolationClass {
    Unique,
    ForeignKey,
}

impl ViolationClass {
    pub(crate) fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            UNIQUE_VIOLATION => Some(Self::Unique),
            FOREIGN_KEY_VIOLATION => Some(Self::ForeignKey),
            _ => None,
        }
    }

    pub(crate) fn of(error: &sqlx::Error) -> Option<Self> {
        match error {
            sqlx::Error::Database(database_error) => database_error
                .code()
                .as_deref()
                .and_then(Self::from_sqlstate),
            _ => None,
        }
    }
}

/// Per-operation meaning of constraint violations.
#[derive(Debug, Default)]
pub(crate) struct ViolationMapping {
    pub unique: Option<AppError>,
    pub foreign_key: Option<AppError>,
}

impl ViolationMapping {
    /// Resolves a classified failure. Unmapped failures become `Internal`
    /// with the operation and cause attached.
    pub(crate) fn resolve(
        self,
        class: Option<ViolationClass>,
        operation: &str,
        cause: impl Display,
    ) -> AppError {
        let mapped = match class {
            Some(ViolationClass::Unique) => self.unique,
            Some(ViolationClass::ForeignKey) => self.foreign_key,
            None => None,
        };

        mapped.unwrap_or_else(|| AppError::Internal(format!("failed to {operation}: {cause}")))
    }

    /// Resolves a `sqlx` write failure.
    pub(crate) fn translate(self, error: sqlx::Error, operation: &str) -> AppError {
        let class = ViolationClass::of(&error);
        if let Some(class) = class {
            debug!(?class, operation, "constraint violation on write");
        }
        self.resolve(class, operation, error)
    }
}

//! Shared primitives for all Rust crates in Rolegate.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across Rolegate crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested role, permission or referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Create or update collides with an existing unique value.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Link creation collides with an existing link.
    #[error("already assigned: {0}")]
    AlreadyAssigned(String),

    /// Link removal targeted a link that does not exist.
    #[error("not assigned: {0}")]
    NotAssigned(String),

    /// Authorization check did not find a grant.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Store or cache failure, malformed data or exceeded deadline.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns whether a caller may reasonably retry the failed operation.
    ///
    /// Only infrastructure failures qualify. Business outcomes such as
    /// `PermissionDenied` are final.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

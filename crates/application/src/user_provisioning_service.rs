use chrono::{DateTime, Utc};
use rolegate_core::{AppError, AppResult};
use rolegate_domain::{RoleId, UserId};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::UserRoleService;

/// Event published by the identity service after a user signs up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserCreatedEvent {
    /// Unique event id.
    pub event_id: Uuid,
    /// Newly created user.
    pub user_id: UserId,
    /// User login.
    pub login: String,
    /// User email.
    pub email: String,
    /// Role to grant on creation.
    pub role_id: RoleId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Result of handling one user-created event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningOutcome {
    /// The initial role was granted.
    Assigned,
    /// The role was already granted by an earlier delivery.
    AlreadyAssigned,
}

/// Grants the initial role of newly created users.
#[derive(Clone)]
pub struct UserProvisioningService {
    user_role_service: UserRoleService,
}

impl UserProvisioningService {
    /// Creates a provisioning service.
    #[must_use]
    pub fn new(user_role_service: UserRoleService) -> Self {
        Self { user_role_service }
    }

    /// Decodes and handles a JSON encoded [`UserCreatedEvent`].
    pub async fn handle_user_created_payload(
        &self,
        payload: &[u8],
    ) -> AppResult<ProvisioningOutcome> {
        let event: UserCreatedEvent = serde_json::from_slice(payload).map_err(|error| {
            AppError::Validation(format!("invalid user created event: {error}"))
        })?;
        self.handle_user_created(event).await
    }

    /// Grants the event's role to the event's user.
    ///
    /// Redelivery of an already handled event is acknowledged.
    pub async fn handle_user_created(
        &self,
        event: UserCreatedEvent,
    ) -> AppResult<ProvisioningOutcome> {
        match self
            .user_role_service
            .assign_role(event.user_id, event.role_id, None)
            .await
        {
            Ok(_) => {
                info!(
                    event_id = %event.event_id,
                    user_id = %event.user_id,
                    role_id = %event.role_id,
                    "provisioned initial role"
                );
                Ok(ProvisioningOutcome::Assigned)
            }
            Err(AppError::AlreadyAssigned(_)) => {
                info!(
                    event_id = %event.event_id,
                    user_id = %event.user_id,
                    role_id = %event.role_id,
                    "initial role already provisioned"
                );
                Ok(ProvisioningOutcome::AlreadyAssigned)
            }
            Err(error) => Err(error),
        }
    }
}

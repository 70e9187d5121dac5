use std::sync::Arc;

use rolegate_core::AppResult;
use rolegate_domain::{PermissionId, RoleId, RolePermissionLink};
use tracing::info;

use crate::{RoleEnrichmentService, RolePermissionRepository};

/// Grants and revokes permissions on roles.
///
/// Every successful mutation drops the role's cached aggregate.
#[derive(Clone)]
pub struct RolePermissionService {
    repository: Arc<dyn RolePermissionRepository>,
    enrichment: RoleEnrichmentService,
}

impl RolePermissionService {
    /// Creates a role permission service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RolePermissionRepository>,
        enrichment: RoleEnrichmentService,
    ) -> Self {
        Self {
            repository,
            enrichment,
        }
    }

    /// Grants a permission to a role.
    pub async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionLink> {
        let link = self
            .repository
            .assign_permission(role_id, permission_id)
            .await?;
        self.enrichment.invalidate(role_id).await;
        info!(%role_id, %permission_id, "permission assigned to role");
        Ok(link)
    }

    /// Revokes a permission from a role.
    pub async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.repository
            .revoke_permission(role_id, permission_id)
            .await?;
        self.enrichment.invalidate(role_id).await;
        info!(%role_id, %permission_id, "permission revoked from role");
        Ok(())
    }
}

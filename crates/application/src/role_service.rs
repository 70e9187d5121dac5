use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{EnrichedRole, Role, RoleId};
use tracing::info;

use crate::{CreateRoleInput, RoleEnrichmentService, RoleRepository, UpdateRoleInput};

/// Role administration use-cases.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleRepository>,
    enrichment: RoleEnrichmentService,
}

impl RoleService {
    /// Creates a role service.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>, enrichment: RoleEnrichmentService) -> Self {
        Self {
            repository,
            enrichment,
        }
    }

    /// Creates a role.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let role = self.repository.create_role(input).await?;
        info!(role_id = %role.id(), name = role.name().as_str(), "role created");
        Ok(role)
    }

    /// Returns a role together with its permissions.
    pub async fn get_role(&self, role_id: RoleId) -> AppResult<EnrichedRole> {
        self.enrichment.get(role_id).await
    }

    /// Lists live roles ordered by name.
    pub async fn list_roles(&self, name_filter: Option<&str>) -> AppResult<Vec<Role>> {
        let name_filter = name_filter.map(str::trim).filter(|value| !value.is_empty());
        self.repository.list_roles(name_filter).await
    }

    /// Applies a partial update and drops the cached aggregate.
    pub async fn update_role(&self, input: UpdateRoleInput) -> AppResult<Role> {
        if input.is_empty() {
            return Err(AppError::Validation(
                "role update must change name or description".to_owned(),
            ));
        }

        let role = self.repository.update_role(input).await?;
        self.enrichment.invalidate(role.id()).await;
        info!(role_id = %role.id(), "role updated");
        Ok(role)
    }

    /// Soft-deletes a role and drops the cached aggregate.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.repository.soft_delete_role(role_id).await?;
        self.enrichment.invalidate(role_id).await;
        info!(%role_id, "role deleted");
        Ok(())
    }
}

use rolegate_core::{AppError, AppResult};
use rolegate_domain::{EnrichedRole, Permission, Role, RoleId};
use serde::{Deserialize, Serialize};

const CACHE_FORMAT_VERSION: u16 = 1;

#[derive(Serialize)]
struct EnrichedRoleCacheViewRef<'a> {
    version: u16,
    role: &'a Role,
    permissions: &'a [Permission],
}

#[derive(Deserialize)]
struct EnrichedRoleCacheView {
    version: u16,
    role: Role,
    permissions: Vec<Permission>,
}

pub(super) fn encode(enriched: &EnrichedRole) -> AppResult<Vec<u8>> {
    serde_json::to_vec(&EnrichedRoleCacheViewRef {
        version: CACHE_FORMAT_VERSION,
        role: enriched.role(),
        permissions: enriched.permissions(),
    })
    .map_err(|error| AppError::Internal(format!("failed to encode enriched role: {error}")))
}

/// Decodes a cache payload, rejecting entries that do not describe a live
/// `expected` role in the current format.
pub(super) fn decode(payload: &[u8], expected: RoleId) -> AppResult<EnrichedRole> {
    let view: EnrichedRoleCacheView = serde_json::from_slice(payload)
        .map_err(|error| AppError::Internal(format!("failed to decode enriched role: {error}")))?;

    if view.version != CACHE_FORMAT_VERSION {
        return Err(AppError::Internal(format!(
            "unsupported enriched role cache format {}",
            view.version
        )));
    }
    if view.role.id() != expected {
        return Err(AppError::Internal(format!(
            "cache entry for role '{expected}' holds role '{}'",
            view.role.id()
        )));
    }
    if view.role.is_deleted() {
        return Err(AppError::Internal(format!(
            "cache entry for role '{expected}' holds a deleted role"
        )));
    }

    Ok(EnrichedRole::new(view.role, view.permissions))
}

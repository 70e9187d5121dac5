use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegate_domain::PermissionId;

use crate::dto::{
    CreatePermissionRequest, PermissionListQuery, PermissionResponse, RoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Query(query): Query<PermissionListQuery>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let filter = query.into_filter()?;
    let permissions = state
        .permission_service
        .list_permissions(&filter)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .permission_service
        .create_permission(payload.into_input()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .permission_service
        .get_permission(permission_id.parse::<PermissionId>()?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn list_permission_roles_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .permission_service
        .list_roles_by_permission(permission_id.parse::<PermissionId>()?)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

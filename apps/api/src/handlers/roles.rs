use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegate_domain::{PermissionId, RoleId};

use crate::dto::{
    CreateRoleRequest, EnrichedRoleResponse, PermissionResponse, RoleListQuery,
    RolePermissionLinkResponse, RoleResponse, RoleUsersPageResponse, RoleUsersQuery,
    UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(query): Query<RoleListQuery>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .role_service
        .list_roles(query.name.as_deref())
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.create_role(payload.into_input()?).await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<EnrichedRoleResponse>> {
    let enriched = state
        .role_service
        .get_role(role_id.parse::<RoleId>()?)
        .await?;

    Ok(Json(EnrichedRoleResponse::from(enriched)))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let input = payload.into_input(role_id.parse::<RoleId>()?)?;
    let role = state.role_service.update_role(input).await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .role_service
        .delete_role(role_id.parse::<RoleId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_role_users_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Query(query): Query<RoleUsersQuery>,
) -> ApiResult<Json<RoleUsersPageResponse>> {
    let role_id = role_id.parse::<RoleId>()?;
    let (limit, cursor) = query.page_request()?;

    let page = state
        .user_role_service
        .get_role_users(role_id, limit, cursor)
        .await?;

    Ok(Json(RoleUsersPageResponse::from(page)))
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .permission_service
        .list_permissions_by_role(role_id.parse::<RoleId>()?)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn assign_role_permission_handler(
    State(state): State<AppState>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> ApiResult<(StatusCode, Json<RolePermissionLinkResponse>)> {
    let link = state
        .role_permission_service
        .assign_permission(
            role_id.parse::<RoleId>()?,
            permission_id.parse::<PermissionId>()?,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RolePermissionLinkResponse::from(link)),
    ))
}

pub async fn revoke_role_permission_handler(
    State(state): State<AppState>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .role_permission_service
        .revoke_permission(
            role_id.parse::<RoleId>()?,
            permission_id.parse::<PermissionId>()?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

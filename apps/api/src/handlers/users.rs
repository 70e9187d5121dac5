use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegate_domain::{RoleId, UserId};

use crate::dto::{AssignRoleQuery, RoleResponse, UserRoleLinkResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .user_role_service
        .get_user_roles(user_id.parse::<UserId>()?)
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn assign_user_role_handler(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(String, String)>,
    Query(query): Query<AssignRoleQuery>,
) -> ApiResult<(StatusCode, Json<UserRoleLinkResponse>)> {
    let link = state
        .user_role_service
        .assign_role(
            user_id.parse::<UserId>()?,
            role_id.parse::<RoleId>()?,
            query.assigned_by()?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UserRoleLinkResponse::from(link))))
}

pub async fn revoke_user_role_handler(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .user_role_service
        .revoke_role(user_id.parse::<UserId>()?, role_id.parse::<RoleId>()?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::AuthzCheckRequest;
use crate::error::ApiResult;
use crate::state::AppState;

/// Answers `204` when the user holds the permission and `403` otherwise.
pub async fn check_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthzCheckRequest>,
) -> ApiResult<StatusCode> {
    let (user_id, resource, action) = payload.into_parts()?;

    state
        .authorization_service
        .check_permission(user_id, &resource, &action)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

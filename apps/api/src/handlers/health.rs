use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

mod checks;

use checks::{check_postgres, check_redis};

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let postgres = check_postgres(state.postgres_pools.as_ref()).await;
    let redis = check_redis(state.redis_cache.as_ref()).await;

    let ready = is_available(&postgres) && is_available(&redis);
    let status = if ready { "ok" } else { "degraded" };
    let http_status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            postgres,
            redis,
        }),
    )
}

/// Dependencies that are not configured do not block readiness.
fn is_available(dependency: &HealthDependencyStatus) -> bool {
    dependency.status != "error"
}

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use rolegate_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api_config::ApiConfig;
use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, config: &ApiConfig) -> Result<Router, AppError> {
    let api_routes = Router::new()
        .route(
            "/api/authz/check",
            post(handlers::authz::check_permission_handler),
        )
        .route(
            "/api/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::roles::get_role_handler)
                .patch(handlers::roles::update_role_handler)
                .delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/users",
            get(handlers::roles::list_role_users_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            get(handlers::roles::list_role_permissions_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions/{permission_id}",
            put(handlers::roles::assign_role_permission_handler)
                .delete(handlers::roles::revoke_role_permission_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::permissions::list_permissions_handler)
                .post(handlers::permissions::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(handlers::permissions::get_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}/roles",
            get(handlers::permissions::list_permission_roles_handler),
        )
        .route(
            "/api/users/{user_id}/roles",
            get(handlers::users::list_user_roles_handler),
        )
        .route(
            "/api/users/{user_id}/roles/{role_id}",
            put(handlers::users::assign_user_role_handler)
                .delete(handlers::users::revoke_user_role_handler),
        )
        .route_layer(from_fn_with_state(
            config.request_timeout,
            middleware::enforce_request_deadline,
        ));

    let router = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http());

    let router = match config.cors_allowed_origin.as_deref() {
        Some(origin) => router.layer(build_cors_layer(origin)?),
        None => router,
    };

    Ok(router.with_state(app_state))
}

fn build_cors_layer(origin: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin).map_err(|error| {
            AppError::Validation(format!("invalid CORS_ALLOWED_ORIGIN: {error}"))
        })?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]))
}

use std::time::Duration;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ErrorResponse;

/// Runs the rest of the stack under a deadline.
///
/// On expiry the handler future is dropped, which cancels any store or cache
/// call still in flight, and the client receives `408 Request Timeout`.
pub async fn enforce_request_deadline(
    State(request_timeout): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match tokio::time::timeout(request_timeout, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                %method,
                path = %path,
                timeout_ms = u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX),
                "request deadline exceeded"
            );
            (
                StatusCode::REQUEST_TIMEOUT,
                Json(ErrorResponse::new("request deadline exceeded")),
            )
                .into_response()
        }
    }
}

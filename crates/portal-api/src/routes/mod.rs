//! API route handlers

pub mod balance;
pub mod deposit;
pub mod health;
pub mod intents;
pub mod locked;
pub mod tokens;
pub mod watch;
pub mod withdrawal;

use axum::{http::StatusCode, routing::get, Json, Router};
use portal_core::PortalError;

use crate::dto::ApiError;
use crate::AppState;

/// Handler result carrying an `ApiError` body on failure
pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/balance", get(balance::get_balance))
        .nest("/tokens", tokens::router())
        .nest("/deposit", deposit::router())
        .nest("/withdrawal", withdrawal::router())
        .nest("/intents", intents::router())
        .nest("/locked", locked::router())
        .nest("/watch", watch::router())
        .with_state(state)
}

pub(crate) fn portal_error(e: PortalError) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiError::new(e.error_code(), e.to_string())),
    )
}

pub(crate) fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message)))
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), (StatusCode, Json<ApiError>)> {
    if value.trim().is_empty() {
        return Err(bad_request(format!("{} is required", field)));
    }
    Ok(())
}

/*
 * Responsibility
 * - Public pages and the gate's redirect targets
 * - UI rendering is external; these endpoints return JSON placeholders so
 *   the redirect targets always resolve
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use serde_json::json;

use crate::error::AppError;
use crate::services::access::decision::LOGIN_PATH;

pub async fn home() -> impl IntoResponse {
    Json(json!({
        "name": "campus-portal-api",
        "status": "ok",
    }))
}

pub async fn login() -> impl IntoResponse {
    Json(json!({
        "message": "sign in through the institutional identity provider",
    }))
}

pub async fn unauthorized() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": {
                "code": "FORBIDDEN",
                "message": "your role does not grant access to that area",
            }
        })),
    )
}

/// The gate canonicalizes `/dashboard` to `/dashboard/{role}` before this
/// handler runs. Reaching it means the gate was not applied; deny.
pub async fn dashboard_root() -> Redirect {
    Redirect::temporary(LOGIN_PATH)
}

pub async fn not_found() -> AppError {
    AppError::not_found("page")
}

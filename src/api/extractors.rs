/*
 * Responsibility
 * - The authenticated-context type handlers see
 * - The gate middleware validates and inserts it into request extensions;
 *   handlers only ever receive this type, never raw session material
 */
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::access::Role;
use crate::state::AppState;

/// Context attached to a request that passed the RBAC gate.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    /// Identity provider's opaque subject id (not a document id).
    pub user_id: String,
    pub role: Role,
}

impl AuthCtx {
    pub fn new(user_id: String, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Extractor for handlers behind the gate.
///
/// Missing context means the gate was not applied to this route; respond 401
/// rather than guessing.
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

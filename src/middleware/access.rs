//! The RBAC gate: axum adapter around the pure decision procedure.
//!
//! Runs once per request before any protected handler. Classifies the path,
//! resolves the caller's identity, performs the (timeout-bounded) role
//! lookup, and translates the resulting [`Decision`] into either `next.run`
//! or a redirect. On ALLOW for a protected route the granted context is
//! placed in request extensions for the `AuthCtx` extractor.
//!
//! The gate holds no state between invocations and never writes anywhere;
//! an aborted request simply discards the decision.

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use crate::api::extractors::AuthCtx;
use crate::repos::role_repo;
use crate::services::access::{Decision, classify, decide};
use crate::state::AppState;

/// Apply the gate to every route of `router`.
///
/// ```ignore
/// let dashboard = access::apply(dashboard_routes(), state.clone());
/// app = app.nest("/dashboard", dashboard);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot take a State extractor in axum 0.8; pass state explicitly.
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    // Nesting strips the prefix from `req.uri()` before inner layers run;
    // classification needs the path as the client sent it.
    OriginalUri(uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let route = classify(uri.path(), &state.gate.protected_prefixes);
    let identity = state.sessions.resolve(req.headers());

    let content = state.content.clone();
    let lookup_timeout = state.gate.role_lookup_timeout;
    let decision = decide(&route, &identity, |user_id| async move {
        // Bounded lookup: a hung store must not hold the response pipeline
        // open, and a timeout denies like any other lookup failure.
        match tokio::time::timeout(lookup_timeout, role_repo::lookup(content.as_ref(), &user_id))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(crate::services::content::ContentError::Timeout.into()),
        }
    })
    .await;

    match decision {
        Decision::Allow(None) => next.run(req).await,
        Decision::Allow(Some(grant)) => {
            req.extensions_mut()
                .insert(AuthCtx::new(grant.user_id, grant.role));
            next.run(req).await
        }
        denied => {
            let target = denied
                .redirect_target()
                .unwrap_or(crate::services::access::decision::LOGIN_PATH);
            tracing::debug!(path = uri.path(), target, "gate redirect");
            Redirect::temporary(target).into_response()
        }
    }
}

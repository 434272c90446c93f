/*
 * Responsibility
 * - /dashboard/admin (and /dashboard/superadmin) handlers: faculties,
 *   departments, user management
 * - Role escalation to/from superadmin is reserved for superadmins
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::api::dto::metadata::{
    CreateDepartmentRequest, DepartmentResponse, FacultyRequest, FacultyResponse,
    UpdateDepartmentRequest,
};
use crate::api::dto::users::{ProfileResponse, UpdateUserRequest, UserSummaryResponse};
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::repos::{department_repo, faculty_repo, user_repo};
use crate::services::access::Role;
use crate::state::AppState;

pub async fn home(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = user_repo::get_profile(state.content.as_ref(), &ctx.user_id)
        .await?
        .ok_or(AppError::not_found("admin profile"))?;
    Ok(Json(ProfileResponse::from(profile)))
}

// --- faculties ---

pub async fn list_faculties(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    let rows = faculty_repo::list(state.content.as_ref()).await?;
    Ok(Json(rows.into_iter().map(FacultyResponse::from).collect()))
}

pub async fn create_faculty(
    State(state): State<AppState>,
    Json(req): Json<FacultyRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;
    let id = faculty_repo::create(state.content.as_ref(), req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn rename_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
    Json(req): Json<FacultyRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;
    faculty_repo::rename(state.content.as_ref(), &faculty_id, req.name.trim()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<String>,
) -> Result<StatusCode, AppError> {
    faculty_repo::delete(state.content.as_ref(), &faculty_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- departments ---

pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentResponse>>, AppError> {
    let rows = department_repo::list(state.content.as_ref()).await?;
    Ok(Json(rows.into_iter().map(DepartmentResponse::from).collect()))
}

pub async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;
    let id =
        department_repo::create(state.content.as_ref(), req.name.trim(), &req.faculty_id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn update_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;
    department_repo::update(
        state.content.as_ref(),
        &department_id,
        req.name.as_deref(),
        req.faculty_id.as_deref(),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_department(
    State(state): State<AppState>,
    Path(department_id): Path<String>,
) -> Result<StatusCode, AppError> {
    department_repo::delete(state.content.as_ref(), &department_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- users ---

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummaryResponse>>, AppError> {
    let rows = user_repo::list(state.content.as_ref()).await?;
    Ok(Json(rows.into_iter().map(UserSummaryResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_doc_id): Path<String>,
) -> Result<Json<UserSummaryResponse>, AppError> {
    let row = user_repo::get_summary(state.content.as_ref(), &user_doc_id)
        .await?
        .ok_or(AppError::not_found("user"))?;
    Ok(Json(UserSummaryResponse::from(row)))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_doc_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let new_role = match req.role.as_deref() {
        Some(raw) => Some(
            Role::from_segment(raw)
                .ok_or_else(|| AppError::bad_request("INVALID_ROLE", "unknown role"))?,
        ),
        None => None,
    };

    let target = user_repo::get_summary(state.content.as_ref(), &user_doc_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    // Only a superadmin may grant or revoke superadmin.
    let touches_superadmin = new_role == Some(Role::Superadmin)
        || target.parsed_role() == Some(Role::Superadmin);
    if touches_superadmin && ctx.role != Role::Superadmin {
        return Err(AppError::Forbidden);
    }

    user_repo::update(
        state.content.as_ref(),
        &user_doc_id,
        new_role,
        req.auth_status.as_deref(),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, header};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use axum::routing::patch;
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::api::extractors::AuthCtx;
    use crate::services::content::{AssetKind, AssetRef, ContentResult, ContentStore, Mutation};
    use crate::services::session::{Identity, SessionResolver};
    use crate::services::webhook::SignatureValidator;
    use crate::state::GateSettings;

    struct NoSession;

    impl SessionResolver for NoSession {
        fn resolve(&self, _headers: &HeaderMap) -> Identity {
            Identity::Anonymous
        }
    }

    /// Stub store answering the user summary point query with a fixed row.
    struct StubStore {
        summary: Value,
    }

    #[async_trait]
    impl ContentStore for StubStore {
        fn backend_name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, _query: &str, _params: &[(&str, Value)]) -> ContentResult<Value> {
            Ok(self.summary.clone())
        }

        async fn mutate(&self, _mutations: &[Mutation]) -> ContentResult<()> {
            Ok(())
        }

        async fn upload_asset(
            &self,
            _kind: AssetKind,
            _filename: &str,
            _content_type: &str,
            _bytes: Vec<u8>,
        ) -> ContentResult<AssetRef> {
            unimplemented!("not used in user management tests")
        }
    }

    async fn as_admin(mut req: Request<Body>, next: Next) -> Response {
        req.extensions_mut()
            .insert(AuthCtx::new("adm-1".to_string(), Role::Admin));
        next.run(req).await
    }

    async fn as_superadmin(mut req: Request<Body>, next: Next) -> Response {
        req.extensions_mut()
            .insert(AuthCtx::new("sup-1".to_string(), Role::Superadmin));
        next.run(req).await
    }

    fn test_app(
        target: Value,
        caller: fn(Request<Body>, Next) -> std::pin::Pin<Box<dyn Future<Output = Response> + Send>>,
    ) -> Router {
        let state = AppState::new(
            Arc::new(StubStore { summary: target }),
            Arc::new(NoSession),
            GateSettings {
                protected_prefixes: vec!["/dashboard".to_string()],
                role_lookup_timeout: Duration::from_millis(100),
            },
            SignatureValidator::new(SecretString::from("test")),
        );

        Router::new()
            .route("/users/{user_doc_id}", patch(update_user))
            .layer(middleware::from_fn(caller))
            .with_state(state)
    }

    fn student_target() -> Value {
        json!({
            "_id": "user-doc-1",
            "userId": "u1",
            "fullName": "Chi Eze",
            "role": "student"
        })
    }

    fn superadmin_target() -> Value {
        // Legacy spelling, as older documents in the store carry it.
        json!({
            "_id": "user-doc-2",
            "userId": "u2",
            "fullName": "Root Admin",
            "role": "superAdmin"
        })
    }

    fn update(path: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("PATCH")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn admin_cannot_grant_superadmin() {
        let app = test_app(student_target(), |req, next| Box::pin(as_admin(req, next)));
        let response = app
            .oneshot(update("/users/user-doc-1", r#"{"role":"superadmin"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_cannot_touch_an_existing_superadmin() {
        let app = test_app(superadmin_target(), |req, next| {
            Box::pin(as_admin(req, next))
        });
        let response = app
            .oneshot(update("/users/user-doc-2", r#"{"auth_status":"verified"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn superadmin_can_grant_superadmin() {
        let app = test_app(student_target(), |req, next| {
            Box::pin(as_superadmin(req, next))
        });
        let response = app
            .oneshot(update("/users/user-doc-1", r#"{"role":"superadmin"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn admin_manages_ordinary_roles() {
        let app = test_app(student_target(), |req, next| Box::pin(as_admin(req, next)));
        let response = app
            .oneshot(update("/users/user-doc-1", r#"{"role":"lecturer"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn unknown_role_value_is_rejected() {
        let app = test_app(student_target(), |req, next| Box::pin(as_admin(req, next)));
        let response = app
            .oneshot(update("/users/user-doc-1", r#"{"role":"wizard"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

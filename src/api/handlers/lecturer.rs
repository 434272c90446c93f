/*
 * Responsibility
 * - /dashboard/lecturer handlers: own assignments CRUD, submissions, grading
 * - Ownership checks compare against the lecturer's user document id; the
 *   gate only guarantees the role, not which lecturer
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};

use crate::api::dto::assignments::{
    AssignmentResponse, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::api::dto::submissions::{GradeRequest, SubmissionResponse};
use crate::api::dto::users::ProfileResponse;
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::repos::user_repo::ProfileDoc;
use crate::repos::{assignment_repo, submission_repo, user_repo};
use crate::services::content::AssetKind;
use crate::state::AppState;

async fn own_profile(state: &AppState, user_id: &str) -> Result<ProfileDoc, AppError> {
    user_repo::get_profile(state.content.as_ref(), user_id)
        .await?
        .ok_or(AppError::not_found("lecturer profile"))
}

pub async fn home(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = own_profile(&state, &ctx.user_id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let profile = own_profile(&state, &ctx.user_id).await?;
    let rows = assignment_repo::list_for_lecturer(state.content.as_ref(), &profile.id).await?;
    Ok(Json(rows.into_iter().map(AssignmentResponse::from).collect()))
}

pub async fn create_assignment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let profile = own_profile(&state, &ctx.user_id).await?;

    let mut resources = Vec::with_capacity(req.resources.len());
    for resource in &req.resources {
        let bytes = BASE64.decode(&resource.data_base64).map_err(|_| {
            AppError::bad_request("INVALID_FILE", "resource data is not valid base64")
        })?;
        let asset = state
            .content
            .upload_asset(
                AssetKind::File,
                &resource.file_name,
                &resource.content_type,
                bytes,
            )
            .await?;
        resources.push((resource.display_name.clone(), asset.id));
    }

    let slug = req.slug();
    let id = assignment_repo::create(
        state.content.as_ref(),
        assignment_repo::NewAssignment {
            title: req.title,
            slug,
            course: req.course,
            lecturer_ref: profile.id,
            department_ref: req.department_id,
            level: req.level,
            due_date: req.due_date,
            question: req.question,
            resources,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Fetch one of the lecturer's own assignments, or fail with 404/403.
async fn owned_assignment(
    state: &AppState,
    lecturer_doc_id: &str,
    assignment_id: &str,
) -> Result<assignment_repo::AssignmentRow, AppError> {
    let row = assignment_repo::get(state.content.as_ref(), assignment_id)
        .await?
        .ok_or(AppError::not_found("assignment"))?;

    let owner = row.lecturer.as_ref().map(|l| l.id.as_str());
    if owner != Some(lecturer_doc_id) {
        return Err(AppError::Forbidden);
    }
    Ok(row)
}

pub async fn get_assignment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(assignment_id): Path<String>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let profile = own_profile(&state, &ctx.user_id).await?;
    let row = owned_assignment(&state, &profile.id, &assignment_id).await?;
    Ok(Json(AssignmentResponse::from(row)))
}

pub async fn update_assignment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(assignment_id): Path<String>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<StatusCode, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let profile = own_profile(&state, &ctx.user_id).await?;
    owned_assignment(&state, &profile.id, &assignment_id).await?;

    let mut set = serde_json::Map::new();
    if let Some(title) = req.title {
        set.insert("title".to_string(), json!(title));
    }
    if let Some(course) = req.course {
        set.insert("course".to_string(), json!(course));
    }
    if let Some(level) = req.level {
        set.insert("level".to_string(), json!(level));
    }
    if let Some(due_date) = req.due_date {
        set.insert("dueDate".to_string(), json!(due_date));
    }
    if let Some(question) = req.question {
        set.insert("question".to_string(), json!(question));
    }
    if set.is_empty() {
        return Ok(StatusCode::NO_CONTENT);
    }

    assignment_repo::update(state.content.as_ref(), &assignment_id, Value::Object(set)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(assignment_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let profile = own_profile(&state, &ctx.user_id).await?;
    owned_assignment(&state, &profile.id, &assignment_id).await?;

    assignment_repo::delete(state.content.as_ref(), &assignment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_submissions(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let profile = own_profile(&state, &ctx.user_id).await?;
    let rows = submission_repo::list_for_lecturer(state.content.as_ref(), &profile.id).await?;
    Ok(Json(rows.into_iter().map(SubmissionResponse::from).collect()))
}

pub async fn grade_submission(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(submission_id): Path<String>,
    Json(req): Json<GradeRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let profile = own_profile(&state, &ctx.user_id).await?;

    let submission = submission_repo::get_for_grading(state.content.as_ref(), &submission_id)
        .await?
        .ok_or(AppError::not_found("submission"))?;

    if submission.lecturer_id.as_deref() != Some(profile.id.as_str()) {
        return Err(AppError::Forbidden);
    }
    // Check-then-act: the read is not part of the mutation batch, so two
    // concurrent grade requests can both pass this guard and each write a
    // grading document. The store offers no read-in-transaction primitive.
    if submission.status.as_deref() == Some("graded") {
        return Err(AppError::bad_request(
            "ALREADY_GRADED",
            "this submission has already been graded",
        ));
    }

    let grading_id = submission_repo::grade(
        state.content.as_ref(),
        &submission_id,
        &profile.id,
        req.score,
        req.max_score,
        req.feedback.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": grading_id }))))
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
    use axum::routing::{get, post};
    use secrecy::SecretString;
    use tower::ServiceExt;

    use super::*;
    use crate::api::extractors::AuthCtx;
    use crate::services::access::Role;
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

    /// Stub store answering the point queries the lecturer handlers issue,
    /// dispatched on the document type in the query text.
    struct StubStore {
        profile: Value,
        assignment: Value,
        submission: Value,
    }

    #[async_trait]
    impl ContentStore for StubStore {
        fn backend_name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, query: &str, _params: &[(&str, Value)]) -> ContentResult<Value> {
            if query.contains(r#"_type == "user""#) {
                Ok(self.profile.clone())
            } else if query.contains(r#"_type == "assignment""#) {
                Ok(self.assignment.clone())
            } else if query.contains(r#"_type == "studentSubmission""#) {
                Ok(self.submission.clone())
            } else {
                Ok(Value::Null)
            }
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
            unimplemented!("not used in ownership tests")
        }
    }

    /// The gate is tested separately; these tests install the auth context
    /// directly, as the gate would after an allow.
    async fn as_lecturer(mut req: Request<Body>, next: Next) -> Response {
        req.extensions_mut()
            .insert(AuthCtx::new("lect-1".to_string(), Role::Lecturer));
        next.run(req).await
    }

    fn test_app(store: StubStore) -> Router {
        let state = AppState::new(
            Arc::new(store),
            Arc::new(NoSession),
            GateSettings {
                protected_prefixes: vec!["/dashboard".to_string()],
                role_lookup_timeout: Duration::from_millis(100),
            },
            SignatureValidator::new(SecretString::from("test")),
        );

        Router::new()
            .route(
                "/assignments/{assignment_id}",
                get(get_assignment).delete(delete_assignment),
            )
            .route("/submissions/{submission_id}/grade", post(grade_submission))
            .layer(middleware::from_fn(as_lecturer))
            .with_state(state)
    }

    fn own_profile_doc() -> Value {
        json!({
            "_id": "lecturer-doc-1",
            "userId": "lect-1",
            "fullName": "Ada Obi",
            "role": "lecturer"
        })
    }

    fn assignment_owned_by(lecturer_doc_id: &str) -> Value {
        json!({
            "_id": "assignment-9",
            "title": "Compilers",
            "lecturer": { "_id": lecturer_doc_id, "name": "Someone" }
        })
    }

    fn grade_request(path: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"score":15.0,"max_score":20.0}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn foreign_assignment_is_forbidden() {
        let app = test_app(StubStore {
            profile: own_profile_doc(),
            assignment: assignment_owned_by("lecturer-doc-2"),
            submission: Value::Null,
        });
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assignments/assignment-9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn foreign_assignment_cannot_be_deleted() {
        let app = test_app(StubStore {
            profile: own_profile_doc(),
            assignment: assignment_owned_by("lecturer-doc-2"),
            submission: Value::Null,
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/assignments/assignment-9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn own_assignment_is_served() {
        let app = test_app(StubStore {
            profile: own_profile_doc(),
            assignment: assignment_owned_by("lecturer-doc-1"),
            submission: Value::Null,
        });
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assignments/assignment-9")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn foreign_submission_cannot_be_graded() {
        let app = test_app(StubStore {
            profile: own_profile_doc(),
            assignment: Value::Null,
            submission: json!({
                "_id": "submission-9",
                "lecturerId": "lecturer-doc-2",
                "status": "pending"
            }),
        });
        let response = app
            .oneshot(grade_request("/submissions/submission-9/grade"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn graded_submission_is_not_regraded() {
        let app = test_app(StubStore {
            profile: own_profile_doc(),
            assignment: Value::Null,
            submission: json!({
                "_id": "submission-9",
                "lecturerId": "lecturer-doc-1",
                "status": "graded"
            }),
        });
        let response = app
            .oneshot(grade_request("/submissions/submission-9/grade"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn own_pending_submission_is_graded() {
        let app = test_app(StubStore {
            profile: own_profile_doc(),
            assignment: Value::Null,
            submission: json!({
                "_id": "submission-9",
                "lecturerId": "lecturer-doc-1",
                "status": "pending"
            }),
        });
        let response = app
            .oneshot(grade_request("/submissions/submission-9/grade"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

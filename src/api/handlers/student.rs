/*
 * Responsibility
 * - /dashboard/student handlers: profile, filtered assignments, submissions
 * - The gate guarantees role == student here; handlers scope everything to
 *   the caller's own user document
 */
use axum::{Json, extract::State, http::StatusCode};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde_json::{Value, json};

use crate::api::dto::assignments::AssignmentResponse;
use crate::api::dto::submissions::{SubmissionResponse, SubmitRequest};
use crate::api::dto::users::ProfileResponse;
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::repos::{assignment_repo, submission_repo, user_repo};
use crate::services::content::AssetKind;
use crate::state::AppState;

pub async fn home(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = user_repo::get_profile(state.content.as_ref(), &ctx.user_id)
        .await?
        .ok_or(AppError::not_found("student profile"))?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Assignments targeted at the student's department and level. A student
/// without both (incomplete provisioning) sees an empty list rather than
/// someone else's assignments.
pub async fn list_assignments(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let profile = user_repo::get_profile(state.content.as_ref(), &ctx.user_id)
        .await?
        .ok_or(AppError::not_found("student profile"))?;

    let (Some(department), Some(level)) = (profile.department, profile.level) else {
        return Ok(Json(Vec::new()));
    };

    let rows = assignment_repo::list_for_department_level(
        state.content.as_ref(),
        &department.id,
        &level,
    )
    .await?;
    Ok(Json(rows.into_iter().map(AssignmentResponse::from).collect()))
}

pub async fn list_submissions(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let profile = user_repo::get_profile(state.content.as_ref(), &ctx.user_id)
        .await?
        .ok_or(AppError::not_found("student profile"))?;

    let rows = submission_repo::list_for_student(state.content.as_ref(), &profile.id).await?;
    Ok(Json(rows.into_iter().map(SubmissionResponse::from).collect()))
}

pub async fn submit(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("VALIDATION_ERROR", m))?;

    let profile = user_repo::get_profile(state.content.as_ref(), &ctx.user_id)
        .await?
        .ok_or(AppError::not_found("student profile"))?;

    let assignment = assignment_repo::get(state.content.as_ref(), &req.assignment_id)
        .await?
        .ok_or(AppError::not_found("assignment"))?;

    if submission_repo::exists(state.content.as_ref(), &assignment.id, &profile.id).await? {
        return Err(AppError::bad_request(
            "ALREADY_SUBMITTED",
            "you have already submitted for this assignment",
        ));
    }

    let mut file_asset_ids = Vec::with_capacity(req.files.len());
    for file in &req.files {
        let bytes = BASE64
            .decode(&file.data_base64)
            .map_err(|_| AppError::bad_request("INVALID_FILE", "file data is not valid base64"))?;
        let asset = state
            .content
            .upload_asset(AssetKind::File, &file.file_name, &file.content_type, bytes)
            .await?;
        file_asset_ids.push(asset.id);
    }

    let id = submission_repo::create(
        state.content.as_ref(),
        submission_repo::NewSubmission {
            assignment_ref: assignment.id,
            student_ref: profile.id,
            file_asset_ids,
            comments: req.comments,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

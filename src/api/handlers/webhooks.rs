/*
 * Responsibility
 * - POST /api/webhooks/identity: provisioning events from the identity
 *   provider, verified against the shared-secret signature
 * - user.created / user.updated upsert a user document; other event types
 *   are acknowledged and ignored
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde_json::{Value, json};

use crate::api::dto::webhooks::IdentityEvent;
use crate::error::AppError;
use crate::repos::user_repo;
use crate::services::access::Role;
use crate::services::webhook::SIGNATURE_HEADER;
use crate::state::AppState;

pub async fn identity_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if let Err(err) = state.webhook_signatures.verify(&body, signature) {
        tracing::warn!(error = %err, "rejected identity webhook");
        return Err(AppError::Unauthorized);
    }

    let event: IdentityEvent = serde_json::from_slice(&body)
        .map_err(|_| AppError::bad_request("INVALID_PAYLOAD", "malformed webhook payload"))?;

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            provision_user(&state, &event).await?;
        }
        other => {
            tracing::debug!(event_type = other, "ignoring identity event");
        }
    }

    Ok(Json(json!({ "success": true })))
}

/// Build and upsert the user document for a provisioning event. Academic
/// references are resolved by display name; unresolvable names are skipped
/// rather than failing the whole event.
async fn provision_user(state: &AppState, event: &IdentityEvent) -> Result<(), AppError> {
    let user = &event.data;
    let metadata = &user.unsafe_metadata;

    let role = metadata
        .role
        .as_deref()
        .and_then(Role::from_store_value)
        .unwrap_or(Role::Student);

    let doc_id = format!("user-{}", user.id);
    let mut doc = serde_json::Map::new();
    doc.insert("_id".to_string(), json!(doc_id));
    doc.insert("_type".to_string(), json!("user"));
    doc.insert("userId".to_string(), json!(user.id));
    doc.insert("fullName".to_string(), json!(user.full_name()));
    doc.insert("role".to_string(), json!(role.segment()));
    doc.insert(
        "contact".to_string(),
        json!({
            "email": user.email(),
            "phoneNumber": metadata.phone_number,
        }),
    );
    doc.insert("authStatus".to_string(), json!("pending"));

    let mut academic = serde_json::Map::new();
    if let Some(name) = metadata.faculty.as_deref()
        && let Some(id) =
            user_repo::reference_id_by_name(state.content.as_ref(), "faculty", name).await?
    {
        academic.insert(
            "faculty".to_string(),
            json!({ "_type": "reference", "_ref": id }),
        );
    }
    if let Some(name) = metadata.department.as_deref()
        && let Some(id) =
            user_repo::reference_id_by_name(state.content.as_ref(), "department", name).await?
    {
        academic.insert(
            "department".to_string(),
            json!({ "_type": "reference", "_ref": id }),
        );
    }
    if role == Role::Student {
        if let Some(level) = &metadata.level {
            academic.insert("level".to_string(), json!(level));
        }
        if let Some(reg) = &metadata.registration_number {
            academic.insert("regNumber".to_string(), json!(reg));
        }
    } else if let Some(staff_id) = &metadata.id_number {
        academic.insert("staffId".to_string(), json!(staff_id));
    }
    if !academic.is_empty() {
        doc.insert("academic".to_string(), Value::Object(academic));
    }

    user_repo::upsert(state.content.as_ref(), &doc_id, Value::Object(doc)).await?;
    tracing::info!(user_id = %user.id, role = %role, event = %event.event_type, "provisioned user");
    Ok(())
}

/*
 * Responsibility
 * - user documents: profiles, admin listing/updates, webhook provisioning
 * - Mirrors the store schema: contact/academic sub-objects, faculty and
 *   department references
 */
use serde::Deserialize;
use serde_json::{Value, json};

use crate::repos::{decode_opt, decode_rows, error::RepoError};
use crate::services::access::Role;
use crate::services::content::{ContentStore, Mutation};

const PROFILE_QUERY: &str = r#"
*[_type == "user" && userId == $userId][0]{
  _id,
  userId,
  fullName,
  role,
  "email": contact.email,
  "phoneNumber": contact.phoneNumber,
  "image": image.asset->url,
  "faculty": academic.faculty->{ _id, name },
  "department": academic.department->{ _id, name },
  "level": academic.level,
  "regNumber": academic.regNumber,
  "staffId": academic.staffId,
  authStatus
}"#;

const LIST_QUERY: &str = r#"
*[_type == "user"] | order(fullName asc) {
  _id,
  userId,
  fullName,
  role,
  "email": contact.email,
  authStatus
}"#;

const SUMMARY_BY_ID_QUERY: &str = r#"
*[_type == "user" && _id == $id][0]{
  _id,
  userId,
  fullName,
  role,
  "email": contact.email,
  authStatus
}"#;

const REFERENCE_BY_NAME_QUERY: &str = r#"*[_type == $type && name == $name][0]._id"#;

#[derive(Debug, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub image: Option<String>,
    pub faculty: Option<NamedRef>,
    pub department: Option<NamedRef>,
    pub level: Option<String>,
    #[serde(rename = "regNumber")]
    pub reg_number: Option<String>,
    #[serde(rename = "staffId")]
    pub staff_id: Option<String>,
    #[serde(rename = "authStatus")]
    pub auth_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "authStatus")]
    pub auth_status: Option<String>,
}

impl UserSummary {
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::from_store_value)
    }
}

pub async fn get_profile(
    store: &dyn ContentStore,
    user_id: &str,
) -> Result<Option<ProfileDoc>, RepoError> {
    let result = store
        .fetch(PROFILE_QUERY, &[("userId", json!(user_id))])
        .await?;
    decode_opt(result)
}

pub async fn list(store: &dyn ContentStore) -> Result<Vec<UserSummary>, RepoError> {
    let result = store.fetch(LIST_QUERY, &[]).await?;
    decode_rows(result)
}

pub async fn get_summary(
    store: &dyn ContentStore,
    doc_id: &str,
) -> Result<Option<UserSummary>, RepoError> {
    let result = store
        .fetch(SUMMARY_BY_ID_QUERY, &[("id", json!(doc_id))])
        .await?;
    decode_opt(result)
}

/// Patch role and/or auth status on a user document.
pub async fn update(
    store: &dyn ContentStore,
    doc_id: &str,
    role: Option<Role>,
    auth_status: Option<&str>,
) -> Result<(), RepoError> {
    let mut set = serde_json::Map::new();
    if let Some(role) = role {
        set.insert("role".to_string(), json!(role.segment()));
    }
    if let Some(status) = auth_status {
        set.insert("authStatus".to_string(), json!(status));
    }
    if set.is_empty() {
        return Ok(());
    }

    store
        .mutate(&[Mutation::Patch {
            id: doc_id.to_string(),
            set: Value::Object(set),
        }])
        .await?;
    Ok(())
}

/// Resolve a faculty/department document id by its display name.
pub async fn reference_id_by_name(
    store: &dyn ContentStore,
    doc_type: &str,
    name: &str,
) -> Result<Option<String>, RepoError> {
    let result = store
        .fetch(
            REFERENCE_BY_NAME_QUERY,
            &[("type", json!(doc_type)), ("name", json!(name))],
        )
        .await?;
    decode_opt(result)
}

/// Idempotent provisioning upsert: create the document if it does not exist,
/// then overwrite its fields. Applied as one transaction so a re-delivered
/// webhook cannot leave a half-written user.
pub async fn upsert(store: &dyn ContentStore, doc_id: &str, doc: Value) -> Result<(), RepoError> {
    let mut set = doc.clone();
    if let Value::Object(map) = &mut set {
        map.remove("_id");
        map.remove("_type");
    }
    store
        .mutate(&[
            Mutation::CreateIfNotExists(doc),
            Mutation::Patch {
                id: doc_id.to_string(),
                set,
            },
        ])
        .await?;
    Ok(())
}

/*
 * Responsibility
 * - assignment documents: list/get/create/update/delete
 * - Queries dereference lecturer/department references and asset urls so
 *   handlers get flat rows
 */
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::repos::user_repo::NamedRef;
use crate::repos::{decode_opt, decode_rows, error::RepoError};
use crate::services::content::{ContentStore, Mutation};

// Shared projection so every assignment row has the same shape.
const PROJECTION: &str = r#"{
  _id,
  _createdAt,
  title,
  "assignmentId": assignmentId.current,
  course,
  "lecturer": lecturer->{ _id, "name": fullName },
  "department": department->{ _id, name },
  level,
  dueDate,
  question,
  resources[]{
    displayName,
    "fileUrl": file.asset->url,
    "fileName": file.asset->originalFilename,
    "fileSize": file.asset->size
  }
}"#;

#[derive(Debug, Deserialize)]
pub struct ResourceRow {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "fileUrl")]
    pub file_url: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(rename = "fileSize")]
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentRow {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(rename = "assignmentId")]
    pub slug: Option<String>,
    pub course: Option<String>,
    pub lecturer: Option<NamedRef>,
    pub department: Option<NamedRef>,
    pub level: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<DateTime<Utc>>,
    pub question: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<ResourceRow>>,
}

/// Fields for a new assignment document. References are document ids.
#[derive(Debug)]
pub struct NewAssignment {
    pub title: String,
    pub slug: String,
    pub course: Option<String>,
    pub lecturer_ref: String,
    pub department_ref: String,
    pub level: String,
    pub due_date: Option<DateTime<Utc>>,
    pub question: Option<String>,
    /// (display name, uploaded file asset id)
    pub resources: Vec<(String, String)>,
}

pub async fn list_for_department_level(
    store: &dyn ContentStore,
    department_id: &str,
    level: &str,
) -> Result<Vec<AssignmentRow>, RepoError> {
    let query = format!(
        r#"*[_type == "assignment" && department._ref == $departmentId && level == $level] | order(dueDate asc) {PROJECTION}"#
    );
    let result = store
        .fetch(
            &query,
            &[
                ("departmentId", json!(department_id)),
                ("level", json!(level)),
            ],
        )
        .await?;
    decode_rows(result)
}

pub async fn list_for_lecturer(
    store: &dyn ContentStore,
    lecturer_id: &str,
) -> Result<Vec<AssignmentRow>, RepoError> {
    let query = format!(
        r#"*[_type == "assignment" && lecturer._ref == $lecturerId] | order(_createdAt desc) {PROJECTION}"#
    );
    let result = store
        .fetch(&query, &[("lecturerId", json!(lecturer_id))])
        .await?;
    decode_rows(result)
}

pub async fn get(
    store: &dyn ContentStore,
    id: &str,
) -> Result<Option<AssignmentRow>, RepoError> {
    let query = format!(r#"*[_type == "assignment" && _id == $id][0] {PROJECTION}"#);
    let result = store.fetch(&query, &[("id", json!(id))]).await?;
    decode_opt(result)
}

pub async fn create(store: &dyn ContentStore, new: NewAssignment) -> Result<String, RepoError> {
    let id = format!("assignment-{}", Uuid::new_v4());

    let resources: Vec<Value> = new
        .resources
        .iter()
        .map(|(display_name, asset_id)| {
            json!({
                "_type": "resource",
                "displayName": display_name,
                "file": {
                    "_type": "file",
                    "asset": { "_type": "reference", "_ref": asset_id }
                }
            })
        })
        .collect();

    let doc = json!({
        "_id": id,
        "_type": "assignment",
        "title": new.title,
        "assignmentId": { "_type": "slug", "current": new.slug },
        "course": new.course,
        "lecturer": { "_type": "reference", "_ref": new.lecturer_ref },
        "department": { "_type": "reference", "_ref": new.department_ref },
        "level": new.level,
        "dueDate": new.due_date,
        "question": new.question,
        "resources": resources,
    });

    store.mutate(&[Mutation::Create(doc)]).await?;
    Ok(id)
}

/// Patch an existing assignment. `set` carries only the changed fields,
/// already in document shape.
pub async fn update(store: &dyn ContentStore, id: &str, set: Value) -> Result<(), RepoError> {
    store
        .mutate(&[Mutation::Patch {
            id: id.to_string(),
            set,
        }])
        .await?;
    Ok(())
}

pub async fn delete(store: &dyn ContentStore, id: &str) -> Result<(), RepoError> {
    store
        .mutate(&[Mutation::Delete { id: id.to_string() }])
        .await?;
    Ok(())
}

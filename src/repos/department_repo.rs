/*
 * Responsibility
 * - department documents (each belongs to a faculty)
 */
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::repos::user_repo::NamedRef;
use crate::repos::{decode_rows, error::RepoError};
use crate::services::content::{ContentStore, Mutation};

const LIST_QUERY: &str = r#"
*[_type == "department"] | order(_updatedAt desc) {
  _id,
  name,
  "faculty": faculty->{ _id, name }
}"#;

#[derive(Debug, Deserialize)]
pub struct DepartmentRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub faculty: Option<NamedRef>,
}

pub async fn list(store: &dyn ContentStore) -> Result<Vec<DepartmentRow>, RepoError> {
    let result = store.fetch(LIST_QUERY, &[]).await?;
    decode_rows(result)
}

pub async fn create(
    store: &dyn ContentStore,
    name: &str,
    faculty_ref: &str,
) -> Result<String, RepoError> {
    let id = format!("department-{}", Uuid::new_v4());
    let doc = json!({
        "_id": id,
        "_type": "department",
        "name": name,
        "faculty": { "_type": "reference", "_ref": faculty_ref },
    });
    store.mutate(&[Mutation::Create(doc)]).await?;
    Ok(id)
}

pub async fn update(
    store: &dyn ContentStore,
    id: &str,
    name: Option<&str>,
    faculty_ref: Option<&str>,
) -> Result<(), RepoError> {
    let mut set = serde_json::Map::new();
    if let Some(name) = name {
        set.insert("name".to_string(), json!(name));
    }
    if let Some(faculty_ref) = faculty_ref {
        set.insert(
            "faculty".to_string(),
            json!({ "_type": "reference", "_ref": faculty_ref }),
        );
    }
    if set.is_empty() {
        return Ok(());
    }

    store
        .mutate(&[Mutation::Patch {
            id: id.to_string(),
            set: serde_json::Value::Object(set),
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

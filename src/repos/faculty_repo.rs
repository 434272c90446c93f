/*
 * Responsibility
 * - faculty documents (institutional metadata managed by admins)
 */
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::repos::{decode_rows, error::RepoError};
use crate::services::content::{ContentStore, Mutation};

const LIST_QUERY: &str = r#"*[_type == "faculty"] | order(_updatedAt desc) { _id, name }"#;

#[derive(Debug, Deserialize)]
pub struct FacultyRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
}

pub async fn list(store: &dyn ContentStore) -> Result<Vec<FacultyRow>, RepoError> {
    let result = store.fetch(LIST_QUERY, &[]).await?;
    decode_rows(result)
}

pub async fn create(store: &dyn ContentStore, name: &str) -> Result<String, RepoError> {
    let id = format!("faculty-{}", Uuid::new_v4());
    let doc = json!({ "_id": id, "_type": "faculty", "name": name });
    store.mutate(&[Mutation::Create(doc)]).await?;
    Ok(id)
}

pub async fn rename(store: &dyn ContentStore, id: &str, name: &str) -> Result<(), RepoError> {
    store
        .mutate(&[Mutation::Patch {
            id: id.to_string(),
            set: json!({ "name": name }),
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

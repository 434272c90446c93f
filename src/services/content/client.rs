//! Document store client interface used by the repos.
//!
//! The store is an external managed service speaking a GROQ-style query API:
//! - `fetch(query, params)` runs a read-only query with `$name` parameters
//! - `mutate(mutations)` applies create/patch/delete in one transaction
//! - `upload_asset` stores a binary blob and returns an asset reference
//!
//! This is intentionally small and JSON-based: repos own the queries and
//! document shapes, the client only moves values across the wire.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

pub type ContentResult<T> = Result<T, ContentError>;

/// Content-store errors (transport / protocol / decode).
///
/// Kept independent from `AppError` so callers decide how to fail: the RBAC
/// gate fails closed on any of these, handlers map them to 500.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content api connection error: {0}")]
    Connection(String),
    #[error("content api request failed: {0}")]
    Request(String),
    #[error("content api returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("content api response could not be decoded: {0}")]
    Decode(String),
    #[error("content api timed out")]
    Timeout,
}

/// One entry in a transactional mutation batch.
#[derive(Debug, Clone)]
pub enum Mutation {
    Create(Value),
    CreateIfNotExists(Value),
    Patch { id: String, set: Value },
    Delete { id: String },
}

impl Mutation {
    /// Wire representation understood by the store's mutate endpoint.
    pub fn to_wire(&self) -> Value {
        match self {
            Mutation::Create(doc) => json!({ "create": doc }),
            Mutation::CreateIfNotExists(doc) => json!({ "createIfNotExists": doc }),
            Mutation::Patch { id, set } => json!({ "patch": { "id": id, "set": set } }),
            Mutation::Delete { id } => json!({ "delete": { "id": id } }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    File,
    Image,
}

impl AssetKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            AssetKind::File => "files",
            AssetKind::Image => "images",
        }
    }
}

/// Reference to an uploaded asset, as returned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: Option<String>,
    #[serde(rename = "originalFilename")]
    pub original_filename: Option<String>,
    pub size: Option<u64>,
}

#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    /// Run a read-only query. `params` are exposed to the query as `$name`.
    /// Returns the raw `result` value; a query with no match yields `null`.
    async fn fetch(&self, query: &str, params: &[(&str, Value)]) -> ContentResult<Value>;

    /// Apply a batch of mutations transactionally (all or nothing).
    async fn mutate(&self, mutations: &[Mutation]) -> ContentResult<()>;

    /// Upload a binary asset and return its reference.
    async fn upload_asset(
        &self,
        kind: AssetKind,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ContentResult<AssetRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_wire_shapes() {
        let create = Mutation::Create(json!({ "_type": "faculty", "name": "Science" }));
        assert_eq!(
            create.to_wire(),
            json!({ "create": { "_type": "faculty", "name": "Science" } })
        );

        let patch = Mutation::Patch {
            id: "doc-1".to_string(),
            set: json!({ "status": "graded" }),
        };
        assert_eq!(
            patch.to_wire(),
            json!({ "patch": { "id": "doc-1", "set": { "status": "graded" } } })
        );

        let delete = Mutation::Delete {
            id: "doc-2".to_string(),
        };
        assert_eq!(delete.to_wire(), json!({ "delete": { "id": "doc-2" } }));
    }
}

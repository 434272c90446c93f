/*
 * Responsibility
 * - The Role Lookup half of the RBAC gate: point query userId -> role
 * - Validates the stored role string against the closed enumeration here,
 *   at the boundary; an unrecognized value is NotFound, never passed along
 */
use serde::Deserialize;
use serde_json::json;

use crate::repos::{decode_opt, error::RepoError};
use crate::services::access::Role;
use crate::services::content::ContentStore;

const ROLE_QUERY: &str = r#"*[_type == "user" && userId == $userId][0]{ userId, role }"#;

#[derive(Debug, Deserialize)]
struct RoleDoc {
    role: Option<String>,
}

/// Look up the durable role assignment for an identity.
///
/// `Ok(None)` covers both "no user document" and "role value outside the
/// enumeration" — the gate treats them the same way.
pub async fn lookup(store: &dyn ContentStore, user_id: &str) -> Result<Option<Role>, RepoError> {
    let result = store
        .fetch(ROLE_QUERY, &[("userId", json!(user_id))])
        .await?;

    let Some(doc) = decode_opt::<RoleDoc>(result)? else {
        return Ok(None);
    };

    let role = doc.role.as_deref().and_then(Role::from_store_value);
    if role.is_none() {
        tracing::debug!(user_id, raw = ?doc.role, "role value outside the enumeration");
    }
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::content::{AssetKind, AssetRef, ContentError, ContentResult, Mutation};
    use async_trait::async_trait;
    use serde_json::Value;

    /// Stub store that answers every fetch with a fixed value (or error).
    struct StubStore {
        result: Result<Value, &'static str>,
    }

    #[async_trait]
    impl ContentStore for StubStore {
        fn backend_name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, _query: &str, _params: &[(&str, Value)]) -> ContentResult<Value> {
            match &self.result {
                Ok(value) => Ok(value.clone()),
                Err(msg) => Err(ContentError::Connection(msg.to_string())),
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
            unimplemented!("not used in role lookup tests")
        }
    }

    #[tokio::test]
    async fn known_role_is_parsed() {
        let store = StubStore {
            result: Ok(json!({ "userId": "u1", "role": "lecturer" })),
        };
        assert_eq!(lookup(&store, "u1").await.unwrap(), Some(Role::Lecturer));
    }

    #[tokio::test]
    async fn legacy_spelling_is_canonicalized() {
        let store = StubStore {
            result: Ok(json!({ "userId": "u1", "role": "superAdmin" })),
        };
        assert_eq!(lookup(&store, "u1").await.unwrap(), Some(Role::Superadmin));
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let store = StubStore {
            result: Ok(Value::Null),
        };
        assert_eq!(lookup(&store, "u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn out_of_enumeration_value_is_none() {
        let store = StubStore {
            result: Ok(json!({ "userId": "u1", "role": "wizard" })),
        };
        assert_eq!(lookup(&store, "u1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn store_error_propagates_as_error() {
        let store = StubStore {
            result: Err("connection refused"),
        };
        assert!(lookup(&store, "u1").await.is_err());
    }
}

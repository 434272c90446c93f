/*
 * Responsibility
 * - Document-store access per document type (queries + mutations)
 * - Repos own the GROQ strings and document shapes; handlers never see raw JSON
 */
pub mod assignment_repo;
pub mod department_repo;
pub mod error;
pub mod faculty_repo;
pub mod role_repo;
pub mod submission_repo;
pub mod user_repo;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::repos::error::RepoError;

/// Decode a query result that is a list. A `null` result is an empty list.
pub(crate) fn decode_rows<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, RepoError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}

/// Decode a query result that is a single document. `null` means no match.
pub(crate) fn decode_opt<T: DeserializeOwned>(value: Value) -> Result<Option<T>, RepoError> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

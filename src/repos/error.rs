/**
 * Responsibility
 * - The meanings a repo can report upward
 */
use thiserror::Error;

use crate::services::content::ContentError;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content store error: {0}")]
    Store(#[from] ContentError),
    #[error("malformed document: {0}")]
    Decode(#[from] serde_json::Error),
}

/**
 * Responsibility
 * - the meaning a storer reports upward
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("item not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

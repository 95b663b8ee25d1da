use thiserror::Error;

use crate::repos::RepoError;

/// The resource engine's standard error channel. Hooks report policy
/// violations through it; the HTTP boundary maps it to status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("conflict")]
    Conflict,
    #[error("precondition failed")]
    PreconditionFailed,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("invalid payload: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for ResourceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => ResourceError::NotFound,
            RepoError::Conflict => ResourceError::Conflict,
            RepoError::Backend(message) => ResourceError::Storage(message),
        }
    }
}

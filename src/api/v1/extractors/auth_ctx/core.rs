use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::services::auth::Principal;

/// The authenticated principal of the request.
///
/// Reads the RequestContext the auth middleware stored in the extensions.
/// Anonymous requests are rejected with 401.
pub struct AuthCtxExtractor(pub Principal);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(RequestContext::principal)
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Unauthorized)
    }
}

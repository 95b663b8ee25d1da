use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;

use crate::context::RequestContext;
use crate::resource::Call;

/// Every resource operation runs with the request it came from, so hooks can
/// re-derive the principal themselves.
impl<S> FromRequestParts<S> for Call
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // nested routers strip their prefix from parts.uri
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let context = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default();

        Ok(Call::new(parts.headers.clone(), uri, context))
    }
}

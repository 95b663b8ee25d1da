//! Bearer token -> Principal -> RequestContext in the request extensions.
//!
//! - no token: the request continues anonymously, the resource hooks decide
//! - token present but unusable: the request stops here (401 / 400 / 403 / 500)
//! - success: the principal is attached to the context and to the request span

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::context::RequestContext;
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Put authentication in front of every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot take a State extractor in axum 0.8
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match state.auth.authenticate(req.headers(), &original_uri).await {
        Ok(Some(principal)) => principal,
        Ok(None) => return Ok(next.run(req).await),
        Err(err) => {
            match &err {
                AuthError::Token(kind) => {
                    tracing::warn!(error = %kind, "access token verification failed");
                }
                AuthError::Claim(claim) => {
                    tracing::warn!(error = %claim, "access token is missing its subject");
                }
                // already logged by the resolver
                AuthError::Resolve(_) => {}
            }
            return Err(err.into());
        }
    };

    tracing::Span::current().record("user_id", principal.id());

    let context = req
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
        .with_principal(principal);

    // picked up by the Call / AuthCtx extractors
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/*
 * Responsibility
 * - what a lifecycle hook sees of the request that triggered it
 *   (headers + uri for re-deriving the principal, and the request context)
 */
use axum::http::{HeaderMap, Uri};

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct Call {
    headers: HeaderMap,
    uri: Uri,
    context: RequestContext,
    internal: bool,
}

impl Call {
    pub fn new(headers: HeaderMap, uri: Uri, context: RequestContext) -> Self {
        Self {
            headers,
            uri,
            context,
            internal: false,
        }
    }

    /// A call issued by the server itself (seeding, principal resolution).
    /// It carries no credentials, so guarded hooks see no principal.
    pub fn internal() -> Self {
        Self {
            internal: true,
            ..Self::new(HeaderMap::new(), Uri::from_static("/"), RequestContext::new())
        }
    }

    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

/*
 * Responsibility
 * - per-request slot carrying the resolved Principal from the auth middleware downstream
 * - value semantics: writing produces a new context, the parent is never aliased
 */
use std::sync::Arc;

use crate::services::auth::Principal;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    principal: Option<Arc<Principal>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this context carrying `principal`.
    pub fn with_principal(&self, principal: Principal) -> Self {
        Self {
            principal: Some(Arc::new(principal)),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_deref()
    }
}

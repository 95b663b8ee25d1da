/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 *   - auth: AuthService (middleware), index: the resource graph (handlers)
 * - cheap to Clone (everything behind Arc)
 */
use std::sync::Arc;

use crate::resource::ResourceIndex;
use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub index: Arc<ResourceIndex>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, index: Arc<ResourceIndex>) -> Self {
        Self { auth, index }
    }
}

/// Factory: build `AuthService` from the startup settings and the resource
/// principals are looked up in.
use std::sync::Arc;

use crate::config::AuthSettings;
use crate::services::auth::AuthService;
use crate::services::auth::principal::{PrincipalLookup, PrincipalResolver};

pub fn build_auth_service(
    settings: &AuthSettings,
    principals: Arc<dyn PrincipalLookup>,
) -> Arc<AuthService> {
    let resolver = PrincipalResolver::new(principals);
    Arc::new(AuthService::from_settings(settings, resolver))
}

pub mod claims;
pub mod extract;
pub mod factory;
pub mod principal;
pub mod service;
pub mod signer;
pub mod token;

pub use claims::{ClaimError, ClaimSet};
pub use factory::build_auth_service;
pub use principal::{Principal, PrincipalLookup, PrincipalResolver, ResolveError};
pub use service::{AuthError, AuthService};
pub use signer::TokenSigner;
pub use token::{TokenError, TokenVerifier};

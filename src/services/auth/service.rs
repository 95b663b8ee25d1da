use axum::http::{HeaderMap, Uri};
use thiserror::Error;

use crate::config::AuthSettings;
use crate::services::auth::claims::{ClaimError, ClaimSet};
use crate::services::auth::extract::{ChainExtractor, TokenExtractor};
use crate::services::auth::principal::{Principal, PrincipalResolver, ResolveError};
use crate::services::auth::token::{TokenError, TokenVerifier};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Claim(#[from] ClaimError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// token -> claims -> subject -> Principal.
///
/// Shared (read-only) by the auth middleware and every ownership hook.
pub struct AuthService {
    extractor: Box<dyn TokenExtractor>,
    verifier: TokenVerifier,
    resolver: PrincipalResolver,
    subject_claim: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("verifier", &self.verifier)
            .field("subject_claim", &self.subject_claim)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        extractor: Box<dyn TokenExtractor>,
        verifier: TokenVerifier,
        resolver: PrincipalResolver,
        subject_claim: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            verifier,
            resolver,
            subject_claim: subject_claim.into(),
        }
    }

    /// OAuth2-style extraction (header, then `access_token`) with the
    /// settings' secret, algorithm and subject claim.
    pub fn from_settings(settings: &AuthSettings, resolver: PrincipalResolver) -> Self {
        Self::new(
            Box::new(ChainExtractor::oauth2()),
            TokenVerifier::from_settings(settings),
            resolver,
            settings.subject_claim.clone(),
        )
    }

    pub fn subject_claim(&self) -> &str {
        &self.subject_claim
    }

    pub fn extract_token(&self, headers: &HeaderMap, uri: &Uri) -> Option<String> {
        self.extractor.extract(headers, uri)
    }

    pub fn verify(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.verifier.verify(token)
    }

    pub async fn resolve(&self, claims: &ClaimSet) -> Result<Principal, AuthError> {
        let subject = claims.required_str(&self.subject_claim)?;
        Ok(self.resolver.resolve(subject).await?)
    }

    /// Full pipeline for one request.
    ///
    /// - `Ok(None)`: the request carries no token at all
    /// - `Ok(Some(_))`: verified and resolved
    /// - `Err(_)`: a token is present but unusable (see `AuthError`)
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        uri: &Uri,
    ) -> Result<Option<Principal>, AuthError> {
        let Some(token) = self.extract_token(headers, uri) else {
            return Ok(None);
        };
        let claims = self.verify(&token)?;
        let principal = self.resolve(&claims).await?;
        Ok(Some(principal))
    }
}

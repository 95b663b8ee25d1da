/*
 * Responsibility
 * - parse + cryptographically verify a bearer token (JWT) and return its claims
 * - key resolution is keyed by the algorithm the token claims; anything but the
 *   configured algorithm is rejected before the signature is looked at
 */
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use thiserror::Error;

use crate::config::AuthSettings;
use crate::services::auth::claims::ClaimSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    MalformedToken,
    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not yet valid")]
    NotYetValid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                Self::UnsupportedAlgorithm
            }
            _ => Self::MalformedToken,
        }
    }
}

/// Picks the verification key for the algorithm a token declares.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, algorithm: Algorithm) -> Result<&DecodingKey, TokenError>;
}

/// One shared secret bound to one algorithm.
pub struct SharedSecret {
    algorithm: Algorithm,
    key: DecodingKey,
}

impl SharedSecret {
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            key: DecodingKey::from_secret(secret),
        }
    }
}

impl KeyResolver for SharedSecret {
    fn resolve(&self, algorithm: Algorithm) -> Result<&DecodingKey, TokenError> {
        if algorithm != self.algorithm {
            return Err(TokenError::UnsupportedAlgorithm);
        }
        Ok(&self.key)
    }
}

pub struct TokenVerifier {
    keys: Box<dyn KeyResolver>,
    leeway_seconds: u64,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(keys: impl KeyResolver + 'static, leeway_seconds: u64) -> Self {
        Self {
            keys: Box::new(keys),
            leeway_seconds,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            SharedSecret::new(settings.jwt_secret.as_bytes(), settings.algorithm),
            settings.leeway_seconds,
        )
    }

    /// Verify a token and return its claims.
    ///
    /// `exp` and `nbf` are checked when present (with leeway) but not
    /// required; the subject claim is checked by the caller.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, TokenError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| TokenError::MalformedToken)?;
        let key = self.keys.resolve(header.alg)?;

        let mut validation = Validation::new(header.alg);
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.validate_nbf = true;
        validation.leeway = self.leeway_seconds;

        let data = jsonwebtoken::decode::<ClaimSet>(token, key, &validation)?;
        Ok(data.claims)
    }
}

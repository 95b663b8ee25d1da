use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::AuthSettings;

/// Mints tokens with the shared secret. Used for the demo tokens printed at
/// startup and by tests; the server has no issuance endpoint.
#[derive(Clone)]
pub struct TokenSigner {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
}

impl TokenSigner {
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.jwt_secret.as_bytes(), settings.algorithm)
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key)
    }

    /// Token whose `subject_claim` is `subject`, issued now, no expiry.
    pub fn token_for(
        &self,
        subject_claim: &str,
        subject: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let mut claims = Map::new();
        claims.insert(subject_claim.to_string(), Value::String(subject.to_string()));
        claims.insert("iat".to_string(), Value::from(chrono::Utc::now().timestamp()));
        self.sign(&claims)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("missing or empty '{0}' claim")]
    MissingClaim(String),
}

/// Decoded payload of a verified token.
///
/// Accessors are explicit about presence: a required claim that is absent,
/// not a string, or blank is a `MissingClaim`, never a silent default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn required_str(&self, name: &str) -> Result<&str, ClaimError> {
        self.optional_str(name)
            .ok_or_else(|| ClaimError::MissingClaim(name.to_string()))
    }

    pub fn optional_str(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    pub fn optional_i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }
}

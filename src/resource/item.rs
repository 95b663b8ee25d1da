/*
 * Responsibility
 * - the record type every resource stores (Item) and its JSON payload
 * - etag derivation (sha256 over the canonical payload)
 */
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Field name -> value map of an item.
pub type Payload = Map<String, Value>;

pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub etag: String,
    pub updated: DateTime<Utc>,
    pub payload: Payload,
}

impl Item {
    /// Builds an item; the payload always carries `"id"` equal to `id`.
    pub fn new(id: impl Into<String>, payload: Payload) -> Self {
        let mut item = Self {
            id: id.into(),
            etag: String::new(),
            updated: Utc::now(),
            payload,
        };
        item.touch();
        item
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Re-derive etag and timestamp after the payload was changed in place
    /// (e.g. by an insert hook stamping a field).
    pub fn touch(&mut self) {
        self.payload
            .insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        self.etag = etag_of(&self.payload);
        self.updated = Utc::now();
    }
}

// serde_json::Map is ordered by key, so the serialization is canonical.
fn etag_of(payload: &Payload) -> String {
    let bytes = serde_json::to_vec(payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(Sha256::digest(&bytes))
}

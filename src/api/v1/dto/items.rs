/*
 * Responsibility
 * - request/response DTOs of the resource routes
 * - server-managed fields (`_etag`, `_updated`) only ever appear in responses
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::{Item, Payload};

pub const RESERVED_PREFIX: char = '_';

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(rename = "_etag")]
    pub etag: String,
    #[serde(rename = "_updated")]
    pub updated: DateTime<Utc>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            payload: item.payload,
            etag: item.etag,
            updated: item.updated,
        }
    }
}

/// POST body: one object or an array of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateItemsRequest {
    Many(Vec<Payload>),
    One(Payload),
}

impl CreateItemsRequest {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            CreateItemsRequest::Many(payloads) if payloads.is_empty() => {
                Err("at least one item is required".into())
            }
            CreateItemsRequest::Many(payloads) => payloads.iter().try_for_each(validate_payload),
            CreateItemsRequest::One(payload) => validate_payload(payload),
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, CreateItemsRequest::Many(_))
    }

    pub fn into_payloads(self) -> Vec<Payload> {
        match self {
            CreateItemsRequest::Many(payloads) => payloads,
            CreateItemsRequest::One(payload) => vec![payload],
        }
    }
}

/// Mirrors the request shape: an object for one item, an array for a batch.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreatedItems {
    One(ItemResponse),
    Many(Vec<ItemResponse>),
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: usize,
}

pub fn validate_payload(payload: &Payload) -> Result<(), String> {
    match payload.keys().find(|k| k.starts_with(RESERVED_PREFIX)) {
        Some(key) => Err(format!("`{key}` is a reserved field")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_object_or_array() {
        let one: CreateItemsRequest = serde_json::from_value(json!({"title": "a"})).unwrap();
        assert!(!one.is_batch());
        assert_eq!(one.into_payloads().len(), 1);

        let many: CreateItemsRequest =
            serde_json::from_value(json!([{"title": "a"}, {"title": "b"}])).unwrap();
        assert!(many.is_batch());
        assert_eq!(many.into_payloads().len(), 2);
    }

    #[test]
    fn reserved_fields_are_rejected() {
        let req: CreateItemsRequest =
            serde_json::from_value(json!([{"title": "a"}, {"_etag": "x"}])).unwrap();
        assert!(req.validate().is_err());

        let empty: CreateItemsRequest = serde_json::from_value(json!([])).unwrap();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn response_flattens_payload() {
        let item = Item::new("p1", json!({"title": "a"}).as_object().cloned().unwrap());
        let etag = item.etag.clone();
        let body = serde_json::to_value(ItemResponse::from(item)).unwrap();
        assert_eq!(body["id"], "p1");
        assert_eq!(body["title"], "a");
        assert_eq!(body["_etag"], etag.as_str());
        assert!(body["_updated"].is_string());
    }
}

/*
 * Responsibility
 * - Principal: the identity a verified subject resolves to
 * - PrincipalResolver: subject id -> Principal through an injected lookup,
 *   with NotFound / Unauthorized / Store kept apart for the caller
 * - no caching: every request resolves fresh
 */
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::resource::{Call, GetOutcome, Item, Lookup, Payload, Resource, ResourceError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    id: String,
    attributes: Payload,
}

impl Principal {
    pub fn from_item(item: Item) -> Self {
        Self {
            id: item.id,
            attributes: item.payload,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attributes(&self) -> &Payload {
        &self.attributes
    }

    /// True when `owner` (an item's owner field) names this principal.
    /// A missing or non-string owner never matches.
    pub fn owns(&self, owner: Option<&Value>) -> bool {
        owner.and_then(Value::as_str) == Some(self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("principal not found")]
    NotFound,
    #[error("principal lookup denied")]
    Unauthorized,
    #[error("principal store error: {0}")]
    Store(String),
}

/// Where principals come from: a single-item read on some resource store.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    async fn lookup(&self, call: &Call, id: &str) -> GetOutcome;
}

#[async_trait]
impl PrincipalLookup for Resource {
    async fn lookup(&self, call: &Call, id: &str) -> GetOutcome {
        let scope = Lookup::new();
        self.get(call, &scope, id).await
    }
}

#[derive(Clone)]
pub struct PrincipalResolver {
    lookup: Arc<dyn PrincipalLookup>,
}

impl std::fmt::Debug for PrincipalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalResolver").finish_non_exhaustive()
    }
}

impl PrincipalResolver {
    pub fn new(lookup: Arc<dyn PrincipalLookup>) -> Self {
        Self { lookup }
    }

    pub async fn resolve(&self, subject: &str) -> Result<Principal, ResolveError> {
        // The lookup runs as an internal call without credentials. A guarded
        // principal store therefore rejects it with Unauthorized while still
        // handing back the item; that self-raised rejection is not a denial.
        let outcome = self.lookup.lookup(&Call::internal(), subject).await;

        let item = match (outcome.item, outcome.error) {
            (Some(item), None) => item,
            (Some(item), Some(ResourceError::Unauthorized)) => {
                tracing::debug!(subject, "ignoring unauthorized raised by the principal lookup itself");
                item
            }
            (None, None) | (_, Some(ResourceError::NotFound)) => {
                tracing::warn!(subject, "principal not found");
                return Err(ResolveError::NotFound);
            }
            (None, Some(ResourceError::Unauthorized)) => {
                tracing::warn!(subject, "principal store denied the lookup");
                return Err(ResolveError::Unauthorized);
            }
            (_, Some(err)) => {
                tracing::error!(subject, error = %err, "principal lookup failed");
                return Err(ResolveError::Store(err.to_string()));
            }
        };

        if item.id != subject {
            tracing::warn!(subject, found = %item.id, "principal id does not match subject");
            return Err(ResolveError::NotFound);
        }

        Ok(Principal::from_item(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(GetOutcome);

    #[async_trait]
    impl PrincipalLookup for Fixed {
        async fn lookup(&self, _call: &Call, _id: &str) -> GetOutcome {
            self.0.clone()
        }
    }

    fn user(id: &str) -> Item {
        Item::new(id, json!({"name": id}).as_object().cloned().unwrap())
    }

    async fn resolve(outcome: GetOutcome, subject: &str) -> Result<Principal, ResolveError> {
        PrincipalResolver::new(Arc::new(Fixed(outcome)))
            .resolve(subject)
            .await
    }

    #[tokio::test]
    async fn found_item_becomes_principal() {
        let p = resolve(GetOutcome::found(user("jack")), "jack").await.unwrap();
        assert_eq!(p.id(), "jack");
        assert_eq!(p.attributes().get("name"), Some(&json!("jack")));
    }

    #[tokio::test]
    async fn self_raised_unauthorized_with_item_is_success() {
        let outcome = GetOutcome {
            item: Some(user("jack")),
            error: Some(ResourceError::Unauthorized),
        };
        assert_eq!(resolve(outcome, "jack").await.unwrap().id(), "jack");
    }

    #[tokio::test]
    async fn outcomes_map_to_distinct_errors() {
        assert_eq!(
            resolve(GetOutcome::failed(ResourceError::NotFound), "x").await,
            Err(ResolveError::NotFound)
        );
        assert_eq!(
            resolve(GetOutcome::failed(ResourceError::Unauthorized), "x").await,
            Err(ResolveError::Unauthorized)
        );
        assert!(matches!(
            resolve(GetOutcome::failed(ResourceError::Storage("down".into())), "x").await,
            Err(ResolveError::Store(msg)) if msg.contains("down")
        ));
    }

    #[tokio::test]
    async fn item_for_another_id_is_not_found() {
        assert_eq!(
            resolve(GetOutcome::found(user("john")), "jack").await,
            Err(ResolveError::NotFound)
        );
    }

    #[test]
    fn owns_requires_equal_string() {
        let p = Principal::from_item(user("jack"));
        assert!(p.owns(Some(&json!("jack"))));
        assert!(!p.owns(Some(&json!("john"))));
        assert!(!p.owns(Some(&json!(1))));
        assert!(!p.owns(None));
    }
}

//! Ownership guard: callers only see and change items they own.
//!
//! The guard re-derives the principal from the request on every hook call
//! instead of trusting what the auth middleware left in the context. When
//! both exist they must agree.
//!
//! Per lifecycle point:
//! - find: owner filter injected into the lookup (no principal: match nothing)
//! - got: foreign or ownerless item becomes `NotFound`, as does any item
//!   read by an anonymous request
//! - insert: owner stamped when absent, foreign owner rejects the batch
//! - update: original and new owner must both be the caller
//! - delete: owner must be the caller
//! - clear: owner filter injected (no principal: `Unauthorized`)

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::resource::{
    Call, GetOutcome, Item, Lookup, Page, Predicate, ResourceError, ResourceHook,
};
use crate::services::auth::{AuthError, AuthService, Principal, ResolveError};

/// Binding of a resource to the field naming its owner. Fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRule {
    pub resource: String,
    pub owner_field: String,
}

impl OwnershipRule {
    pub fn new(resource: impl Into<String>, owner_field: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            owner_field: owner_field.into(),
        }
    }
}

#[derive(Debug)]
pub struct OwnershipGuard {
    rule: OwnershipRule,
    auth: Arc<AuthService>,
}

impl OwnershipGuard {
    pub fn new(rule: OwnershipRule, auth: Arc<AuthService>) -> Self {
        Self { rule, auth }
    }

    pub fn rule(&self) -> &OwnershipRule {
        &self.rule
    }

    /// `Ok(None)` when the call carries no usable credentials. Only a
    /// failing principal store is an error.
    async fn principal(&self, call: &Call) -> Result<Option<Principal>, ResourceError> {
        let principal = match self.auth.authenticate(call.headers(), call.uri()).await {
            Ok(principal) => principal,
            Err(AuthError::Resolve(ResolveError::Store(message))) => {
                return Err(ResourceError::Storage(message));
            }
            Err(err) => {
                tracing::debug!(resource = %self.rule.resource, error = %err, "no usable principal");
                None
            }
        };

        if let (Some(derived), Some(attached)) = (&principal, call.context().principal())
            && derived.id() != attached.id()
        {
            tracing::warn!(
                resource = %self.rule.resource,
                derived = %derived.id(),
                attached = %attached.id(),
                "principal in request context disagrees with token"
            );
            return Ok(None);
        }

        Ok(principal)
    }

    async fn require_principal(&self, call: &Call) -> Result<Principal, ResourceError> {
        self.principal(call).await?.ok_or_else(|| {
            tracing::debug!(resource = %self.rule.resource, "rejected: no principal");
            ResourceError::Unauthorized
        })
    }

    fn owned_by(&self, principal: &Principal) -> Predicate {
        Predicate::equal(self.rule.owner_field.clone(), principal.id())
    }

    fn check_owner(&self, principal: &Principal, item: &Item) -> Result<(), ResourceError> {
        if principal.owns(item.field(&self.rule.owner_field)) {
            return Ok(());
        }
        tracing::debug!(
            resource = %self.rule.resource,
            user_id = %principal.id(),
            item = %item.id,
            "rejected: not the owner"
        );
        Err(ResourceError::Unauthorized)
    }
}

#[async_trait]
impl ResourceHook for OwnershipGuard {
    async fn on_find(
        &self,
        call: &Call,
        lookup: &mut Lookup,
        _page: Option<Page>,
    ) -> Result<(), ResourceError> {
        match self.principal(call).await? {
            Some(principal) => lookup.add_predicate(self.owned_by(&principal)),
            // anonymous listing sees nothing, and nothing is fetched
            None => lookup.add_predicate(Predicate::MatchNone),
        }
        Ok(())
    }

    async fn on_got(&self, call: &Call, got: &mut GetOutcome) {
        // Do not override existing errors
        if got.error.is_some() {
            return;
        }
        let principal = match self.principal(call).await {
            Ok(Some(principal)) => principal,
            // Server-side lookups (principal resolution) keep the item and
            // get told they were not authorized; the resolver relies on it.
            Ok(None) if call.is_internal() => {
                got.error = Some(ResourceError::Unauthorized);
                return;
            }
            Ok(None) => {
                got.item = None;
                got.error = Some(ResourceError::NotFound);
                return;
            }
            Err(err) => {
                got.item = None;
                got.error = Some(err);
                return;
            }
        };
        let owned = got
            .item
            .as_ref()
            .is_some_and(|item| principal.owns(item.field(&self.rule.owner_field)));
        if !owned {
            // same answer as a missing item
            got.item = None;
            got.error = Some(ResourceError::NotFound);
        }
    }

    async fn on_insert(&self, call: &Call, items: &mut [Item]) -> Result<(), ResourceError> {
        let principal = self.require_principal(call).await?;
        for item in items.iter_mut() {
            match item.payload.get(&self.rule.owner_field) {
                None | Some(Value::Null) => {
                    item.payload.insert(
                        self.rule.owner_field.clone(),
                        Value::String(principal.id().to_string()),
                    );
                }
                Some(_) => self.check_owner(&principal, item)?,
            }
        }
        Ok(())
    }

    async fn on_update(
        &self,
        call: &Call,
        item: &Item,
        original: &Item,
    ) -> Result<(), ResourceError> {
        let principal = self.require_principal(call).await?;
        self.check_owner(&principal, original)?;
        // ownership cannot be moved by the update payload either
        self.check_owner(&principal, item)
    }

    async fn on_delete(&self, call: &Call, item: &Item) -> Result<(), ResourceError> {
        let principal = self.require_principal(call).await?;
        self.check_owner(&principal, item)
    }

    async fn on_clear(&self, call: &Call, lookup: &mut Lookup) -> Result<(), ResourceError> {
        let principal = self.require_principal(call).await?;
        lookup.add_predicate(self.owned_by(&principal));
        Ok(())
    }
}

/*
 * Responsibility
 * - one named collection of items: storer + hooks + mode
 * - the six operations, each invoking its lifecycle hook at a fixed point
 *   (find/clear: before the storer sees the lookup, get: after fetch,
 *    insert/update/delete: before the write)
 */
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use uuid::Uuid;

use crate::repos::{ItemList, Storer};
use crate::resource::call::Call;
use crate::resource::error::ResourceError;
use crate::resource::hook::{GetOutcome, ResourceHook};
use crate::resource::item::{ID_FIELD, Item, Payload};
use crate::resource::query::{Lookup, Page, Predicate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadWrite,
    ReadOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceConf {
    pub mode: Mode,
}

impl ResourceConf {
    pub fn read_write() -> Self {
        Self {
            mode: Mode::ReadWrite,
        }
    }

    pub fn read_only() -> Self {
        Self {
            mode: Mode::ReadOnly,
        }
    }
}

/// How an update combines with the stored payload.
#[derive(Debug, Clone)]
pub enum Change {
    /// PUT: the payload replaces the stored one.
    Replace(Payload),
    /// PATCH: top-level fields are merged over the stored payload.
    Merge(Payload),
}

pub struct Resource {
    name: String,
    storer: Arc<dyn Storer>,
    conf: ResourceConf,
    hooks: RwLock<Vec<Arc<dyn ResourceHook>>>,
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("conf", &self.conf)
            .field("hooks", &self.hooks().len())
            .finish()
    }
}

impl Resource {
    pub fn new(name: impl Into<String>, storer: Arc<dyn Storer>, conf: ResourceConf) -> Self {
        Self {
            name: name.into(),
            storer,
            conf,
            hooks: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conf(&self) -> ResourceConf {
        self.conf
    }

    /// Attach a hook. Meant for startup wiring only.
    pub fn use_hook(&self, hook: Arc<dyn ResourceHook>) {
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    // Snapshot so the lock is released before any hook is awaited.
    fn hooks(&self) -> Vec<Arc<dyn ResourceHook>> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn ensure_writable(&self) -> Result<(), ResourceError> {
        match self.conf.mode {
            Mode::ReadWrite => Ok(()),
            Mode::ReadOnly => Err(ResourceError::MethodNotAllowed),
        }
    }

    pub async fn find(
        &self,
        call: &Call,
        mut lookup: Lookup,
        page: Option<Page>,
    ) -> Result<ItemList, ResourceError> {
        for hook in self.hooks() {
            hook.on_find(call, &mut lookup, page).await?;
        }
        Ok(self.storer.find(&lookup, page).await?)
    }

    pub async fn get(&self, call: &Call, scope: &Lookup, id: &str) -> GetOutcome {
        let mut got = match self.fetch_scoped(scope, id).await {
            Ok(item) => GetOutcome::found(item),
            Err(e) => GetOutcome::failed(e),
        };
        for hook in self.hooks() {
            hook.on_got(call, &mut got).await;
        }
        got
    }

    pub async fn insert(
        &self,
        call: &Call,
        scope: &Lookup,
        payloads: Vec<Payload>,
    ) -> Result<Vec<Item>, ResourceError> {
        self.ensure_writable()?;

        let mut items = payloads
            .into_iter()
            .map(|mut payload| -> Result<Item, ResourceError> {
                apply_scope(scope, &mut payload)?;
                let id = item_id(&payload)?;
                Ok(Item::new(id, payload))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for hook in self.hooks() {
            hook.on_insert(call, &mut items).await?;
        }
        // hooks may have stamped fields
        for item in &mut items {
            item.touch();
        }

        self.storer.insert(&items).await?;
        tracing::debug!(resource = %self.name, count = items.len(), "items inserted");
        Ok(items)
    }

    pub async fn update(
        &self,
        call: &Call,
        scope: &Lookup,
        id: &str,
        change: Change,
        if_match: Option<&str>,
    ) -> Result<Item, ResourceError> {
        self.ensure_writable()?;

        let original = self.fetch_scoped(scope, id).await?;
        check_etag(&original, if_match)?;

        let mut payload = match change {
            Change::Replace(payload) => payload,
            Change::Merge(patch) => {
                let mut merged = original.payload.clone();
                merged.extend(patch);
                merged
            }
        };
        if let Some(value) = payload.get(ID_FIELD)
            && value.as_str() != Some(original.id.as_str())
        {
            return Err(ResourceError::Validation("`id` cannot be changed".into()));
        }
        apply_scope(scope, &mut payload)?;

        let item = Item::new(original.id.clone(), payload);
        for hook in self.hooks() {
            hook.on_update(call, &item, &original).await?;
        }

        self.storer.update(&item, &original).await?;
        tracing::debug!(resource = %self.name, id = %item.id, "item updated");
        Ok(item)
    }

    pub async fn delete(
        &self,
        call: &Call,
        scope: &Lookup,
        id: &str,
        if_match: Option<&str>,
    ) -> Result<(), ResourceError> {
        self.ensure_writable()?;

        let item = self.fetch_scoped(scope, id).await?;
        check_etag(&item, if_match)?;

        for hook in self.hooks() {
            hook.on_delete(call, &item).await?;
        }

        self.storer.delete(&item).await?;
        tracing::debug!(resource = %self.name, id = %item.id, "item deleted");
        Ok(())
    }

    pub async fn clear(&self, call: &Call, mut lookup: Lookup) -> Result<usize, ResourceError> {
        self.ensure_writable()?;

        for hook in self.hooks() {
            hook.on_clear(call, &mut lookup).await?;
        }

        let deleted = self.storer.clear(&lookup).await?;
        tracing::debug!(resource = %self.name, deleted, "items cleared");
        Ok(deleted)
    }

    async fn fetch_scoped(&self, scope: &Lookup, id: &str) -> Result<Item, ResourceError> {
        match self.storer.fetch(id).await? {
            Some(item) if scope.matches(&item) => Ok(item),
            _ => Err(ResourceError::NotFound),
        }
    }
}

fn check_etag(item: &Item, if_match: Option<&str>) -> Result<(), ResourceError> {
    match if_match {
        Some(etag) if etag.trim_matches('"') != item.etag => {
            Err(ResourceError::PreconditionFailed)
        }
        _ => Ok(()),
    }
}

// Stamp the scope's fields (the parent reference of a sub-resource) and
// reject payloads pointing elsewhere.
fn apply_scope(scope: &Lookup, payload: &mut Payload) -> Result<(), ResourceError> {
    for predicate in scope.predicates() {
        let Predicate::Equal { field, value } = predicate else {
            continue;
        };
        match payload.get(field) {
            None | Some(Value::Null) => {
                payload.insert(field.clone(), value.clone());
            }
            Some(current) if current == value => {}
            Some(_) => {
                return Err(ResourceError::Validation(format!(
                    "`{field}` must match the parent item"
                )));
            }
        }
    }
    Ok(())
}

fn item_id(payload: &Payload) -> Result<String, ResourceError> {
    match payload.get(ID_FIELD) {
        None | Some(Value::Null) => Ok(Uuid::new_v4().to_string()),
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(id.clone()),
        Some(_) => Err(ResourceError::Validation(
            "`id` must be a non-empty string".into(),
        )),
    }
}

use async_trait::async_trait;

use crate::resource::call::Call;
use crate::resource::error::ResourceError;
use crate::resource::item::Item;
use crate::resource::query::{Lookup, Page};

/// Result of a single-item read once the `on_got` hooks ran.
///
/// A hook may attach an error while the fetched item is still present, so
/// both halves are kept; `into_result` lets the error win.
#[derive(Debug, Clone, PartialEq)]
pub struct GetOutcome {
    pub item: Option<Item>,
    pub error: Option<ResourceError>,
}

impl GetOutcome {
    pub fn found(item: Item) -> Self {
        Self {
            item: Some(item),
            error: None,
        }
    }

    pub fn failed(error: ResourceError) -> Self {
        Self {
            item: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<Item, ResourceError> {
        match (self.error, self.item) {
            (Some(error), _) => Err(error),
            (None, Some(item)) => Ok(item),
            (None, None) => Err(ResourceError::NotFound),
        }
    }
}

/// Callbacks the engine invokes at fixed points of each operation.
/// Every method defaults to a no-op.
#[async_trait]
pub trait ResourceHook: Send + Sync {
    /// Before a list query reaches the storer.
    async fn on_find(
        &self,
        _call: &Call,
        _lookup: &mut Lookup,
        _page: Option<Page>,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    /// After a single item was fetched, before it is returned.
    async fn on_got(&self, _call: &Call, _got: &mut GetOutcome) {}

    /// Before a batch is stored. Hooks may edit the items.
    async fn on_insert(&self, _call: &Call, _items: &mut [Item]) -> Result<(), ResourceError> {
        Ok(())
    }

    async fn on_update(
        &self,
        _call: &Call,
        _item: &Item,
        _original: &Item,
    ) -> Result<(), ResourceError> {
        Ok(())
    }

    async fn on_delete(&self, _call: &Call, _item: &Item) -> Result<(), ResourceError> {
        Ok(())
    }

    /// Before a bulk clear reaches the storer.
    async fn on_clear(&self, _call: &Call, _lookup: &mut Lookup) -> Result<(), ResourceError> {
        Ok(())
    }
}

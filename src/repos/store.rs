use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::resource::item::Item;
use crate::resource::query::{Lookup, Page};

/// One page of a find, with the number of items matching the lookup overall.
#[derive(Debug, Clone, Default)]
pub struct ItemList {
    pub total: usize,
    pub items: Vec<Item>,
}

/// Persistence behind a resource.
///
/// The resource layer has already applied every policy by the time a storer
/// is called: the lookup it receives is final and the items are validated.
/// Implementations must not hold a lock across an `.await`.
#[async_trait]
pub trait Storer: Send + Sync {
    async fn find(&self, lookup: &Lookup, page: Option<Page>) -> RepoResult<ItemList>;

    async fn fetch(&self, id: &str) -> RepoResult<Option<Item>>;

    // All or nothing: a duplicate id rejects the whole batch with `Conflict`.
    async fn insert(&self, items: &[Item]) -> RepoResult<()>;

    // `original.etag` must still be the stored etag, otherwise `Conflict`.
    async fn update(&self, item: &Item, original: &Item) -> RepoResult<()>;

    async fn delete(&self, item: &Item) -> RepoResult<()>;

    // Returns the number of removed items.
    async fn clear(&self, lookup: &Lookup) -> RepoResult<usize>;
}

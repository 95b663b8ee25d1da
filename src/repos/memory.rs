/*
 * Responsibility
 * - in-process Storer (BTreeMap keyed by id, ordered listing)
 * - etag compare-and-swap on update/delete
 */
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{ItemList, Storer};
use crate::resource::item::Item;
use crate::resource::query::{Lookup, Page};

#[derive(Debug, Default)]
pub struct MemoryStorer {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryStorer {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, BTreeMap<String, Item>>> {
        self.items
            .read()
            .map_err(|_| RepoError::Backend("memory store lock poisoned".into()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, BTreeMap<String, Item>>> {
        self.items
            .write()
            .map_err(|_| RepoError::Backend("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl Storer for MemoryStorer {
    async fn find(&self, lookup: &Lookup, page: Option<Page>) -> RepoResult<ItemList> {
        if lookup.matches_nothing() {
            return Ok(ItemList::default());
        }

        let items = self.read()?;
        let matching = items.values().filter(|item| lookup.matches(item));
        let total = matching.clone().count();

        let items = match page {
            Some(page) => matching
                .skip(page.offset())
                .take(page.per_page)
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(ItemList { total, items })
    }

    async fn fetch(&self, id: &str) -> RepoResult<Option<Item>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn insert(&self, batch: &[Item]) -> RepoResult<()> {
        let mut items = self.write()?;
        if batch.iter().any(|item| items.contains_key(&item.id)) {
            return Err(RepoError::Conflict);
        }
        for item in batch {
            items.insert(item.id.clone(), item.clone());
        }
        Ok(())
    }

    async fn update(&self, item: &Item, original: &Item) -> RepoResult<()> {
        let mut items = self.write()?;
        let current = items.get(&original.id).ok_or(RepoError::NotFound)?;
        if current.etag != original.etag {
            return Err(RepoError::Conflict);
        }
        items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn delete(&self, item: &Item) -> RepoResult<()> {
        let mut items = self.write()?;
        let current = items.get(&item.id).ok_or(RepoError::NotFound)?;
        if current.etag != item.etag {
            return Err(RepoError::Conflict);
        }
        items.remove(&item.id);
        Ok(())
    }

    async fn clear(&self, lookup: &Lookup) -> RepoResult<usize> {
        if lookup.matches_nothing() {
            return Ok(0);
        }

        let mut items = self.write()?;
        let before = items.len();
        items.retain(|_, item| !lookup.matches(item));
        Ok(before - items.len())
    }
}

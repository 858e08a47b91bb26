//! Catalog store: id allocation, mutations and filter queries.
//!
//! # Invariants
//! - `items` is sorted by ascending id. Ids are allocated monotonically, so
//!   this is also creation order and lookups can binary search.
//! - `next_id` is strictly greater than every id ever handed out, including
//!   ids of removed items.
//! - Queries and `iter()` yield most-recently-created first.

use crate::catalog::filter::ItemFilter;
use crate::catalog::{CatalogError, CatalogResult};
use crate::model::item::{now_epoch_ms, Item, ItemId, ItemPatch, ItemStatus, NewItem};
use serde::Serialize;
use std::collections::BTreeSet;
use std::iter::{FusedIterator, Rev};
use std::slice;

/// First id handed out by an empty store.
pub const FIRST_ITEM_ID: ItemId = 1;

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub featured: usize,
    pub total_views: u64,
}

/// Authoritative in-memory item collection.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    items: Vec<Item>,
    next_id: ItemId,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: FIRST_ITEM_ID,
        }
    }

    /// Rebuilds a store from a persisted snapshot.
    ///
    /// `next_id` is the persisted allocation high-water mark. It is raised
    /// when needed so it always exceeds every loaded id.
    ///
    /// # Errors
    /// - `DuplicateId` when two items share an id.
    /// - `Validation` when a loaded item breaks record invariants.
    /// - `IdSpaceExhausted` when an item holds `ItemId::MAX`.
    pub fn from_items(mut items: Vec<Item>, next_id: ItemId) -> CatalogResult<Self> {
        items.sort_by_key(|item| item.id);
        for pair in items.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(CatalogError::DuplicateId(pair[0].id));
            }
        }
        for item in &items {
            item.validate()?;
        }

        let after_last = match items.last() {
            Some(item) => item
                .id
                .checked_add(1)
                .ok_or(CatalogError::IdSpaceExhausted)?,
            None => FIRST_ITEM_ID,
        };
        Ok(Self {
            items,
            next_id: next_id.max(after_last).max(FIRST_ITEM_ID),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next successful `create` will assign.
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// Creates an item stamped with the current time.
    pub fn create(&mut self, input: NewItem) -> CatalogResult<Item> {
        self.create_at(input, now_epoch_ms())
    }

    /// Creates an item with an explicit `created_at` (epoch ms).
    ///
    /// A validation failure does not consume an id. Once the id after
    /// `next_id` would overflow, every create fails with `IdSpaceExhausted`.
    pub fn create_at(&mut self, input: NewItem, created_at: i64) -> CatalogResult<Item> {
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted)?;
        let item = Item::from_input(self.next_id, input, created_at)?;
        self.next_id = following;
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn get(&self, id: ItemId) -> CatalogResult<&Item> {
        let index = self.position(id)?;
        Ok(&self.items[index])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_ok()
    }

    /// Merges `patch` into the item with `id` and returns the new value.
    ///
    /// `id`, `created_at` and `views` are preserved.
    pub fn update(&mut self, id: ItemId, patch: &ItemPatch) -> CatalogResult<Item> {
        let index = self.position(id)?;
        let updated = self.items[index].apply_patch(patch)?;
        self.items[index] = updated.clone();
        Ok(updated)
    }

    /// Removes the item with `id` and returns it. The id is never reissued.
    pub fn remove(&mut self, id: ItemId) -> CatalogResult<Item> {
        let index = self.position(id)?;
        Ok(self.items.remove(index))
    }

    /// Increments the view counter and returns the new count.
    pub fn record_view(&mut self, id: ItemId) -> CatalogResult<u64> {
        let index = self.position(id)?;
        let item = &mut self.items[index];
        item.views = item.views.saturating_add(1);
        Ok(item.views)
    }

    /// Runs the text + category query.
    ///
    /// `category == "all"` disables the category check. The returned iterator
    /// is lazy; clone it to restart.
    pub fn query(&self, search_text: &str, category: &str) -> CatalogQuery<'_> {
        self.query_with(ItemFilter::new(search_text, category))
    }

    pub fn query_with(&self, filter: ItemFilter) -> CatalogQuery<'_> {
        CatalogQuery {
            items: self.items.iter().rev(),
            filter,
        }
    }

    /// All items, most recently created first.
    pub fn iter(&self) -> Rev<slice::Iter<'_, Item>> {
        self.items.iter().rev()
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut categories = Vec::new();
        for item in self.iter() {
            if seen.insert(item.category.as_str()) {
                categories.push(item.category.clone());
            }
        }
        categories
    }

    pub fn stats(&self) -> CatalogStats {
        self.items
            .iter()
            .fold(CatalogStats::default(), |mut stats, item| {
                stats.total += 1;
                match item.status {
                    ItemStatus::Published => stats.published += 1,
                    ItemStatus::Draft => stats.drafts += 1,
                }
                if item.featured {
                    stats.featured += 1;
                }
                stats.total_views = stats.total_views.saturating_add(item.views);
                stats
            })
    }

    /// Puts `item` back at its sorted slot, replacing any current value.
    ///
    /// Used to undo an update or removal when a persistence step fails.
    pub(crate) fn put_back(&mut self, item: Item) {
        match self.items.binary_search_by_key(&item.id, |current| current.id) {
            Ok(index) => self.items[index] = item,
            Err(index) => self.items.insert(index, item),
        }
    }

    fn position(&self, id: ItemId) -> CatalogResult<usize> {
        self.items
            .binary_search_by_key(&id, |item| item.id)
            .map_err(|_| CatalogError::NotFound(id))
    }
}

impl<'a> IntoIterator for &'a CatalogStore {
    type Item = &'a Item;
    type IntoIter = Rev<slice::Iter<'a, Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy, restartable result of a catalog query.
#[derive(Debug, Clone)]
pub struct CatalogQuery<'a> {
    items: Rev<slice::Iter<'a, Item>>,
    filter: ItemFilter,
}

impl CatalogQuery<'_> {
    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }
}

impl<'a> Iterator for CatalogQuery<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = &self.filter;
        self.items.find(|item| filter.matches(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

impl FusedIterator for CatalogQuery<'_> {}

#[cfg(test)]
mod tests {
    use super::{CatalogStore, FIRST_ITEM_ID};
    use crate::catalog::CatalogError;
    use crate::model::item::{Item, ItemId, ItemPatch, ItemValidationError, NewItem};

    #[test]
    fn from_items_resumes_after_high_water_mark() {
        let first = Item::from_input(3, NewItem::new("A", "X"), 0).expect("valid");
        let store = CatalogStore::from_items(vec![first], 10).expect("snapshot");
        assert_eq!(store.next_id(), 10);

        let second = Item::from_input(12, NewItem::new("B", "X"), 0).expect("valid");
        let store = CatalogStore::from_items(vec![second], 5).expect("snapshot");
        assert_eq!(store.next_id(), 13);

        let empty = CatalogStore::from_items(Vec::new(), 0).expect("empty snapshot");
        assert_eq!(empty.next_id(), FIRST_ITEM_ID);
    }

    #[test]
    fn from_items_rejects_duplicate_ids() {
        let a = Item::from_input(4, NewItem::new("A", "X"), 0).expect("valid");
        let b = Item::from_input(4, NewItem::new("B", "X"), 0).expect("valid");
        let err = CatalogStore::from_items(vec![a, b], 0).expect_err("duplicate ids");
        assert_eq!(err, CatalogError::DuplicateId(4));
    }

    #[test]
    fn from_items_rejects_untrimmed_snapshot_item() {
        let mut padded = Item::from_input(1, NewItem::new("A", "X"), 0).expect("valid");
        padded.title = " A ".to_string();
        let err = CatalogStore::from_items(vec![padded], 0).expect_err("untrimmed title");
        assert_eq!(
            err,
            CatalogError::Validation(ItemValidationError::Untrimmed("title"))
        );
    }

    #[test]
    fn from_items_rejects_item_at_top_of_id_range() {
        let top = Item::from_input(ItemId::MAX, NewItem::new("Top", "X"), 0).expect("valid");
        let err = CatalogStore::from_items(vec![top], 0).expect_err("no id left after MAX");
        assert_eq!(err, CatalogError::IdSpaceExhausted);
    }

    #[test]
    fn create_fails_cleanly_when_ids_run_out() {
        let below_top = Item::from_input(ItemId::MAX - 2, NewItem::new("Old", "X"), 0)
            .expect("valid");
        let mut store = CatalogStore::from_items(vec![below_top], 0).expect("snapshot");
        assert_eq!(store.next_id(), ItemId::MAX - 1);

        let last = store.create_at(NewItem::new("Last", "X"), 0).expect("create");
        assert_eq!(last.id, ItemId::MAX - 1);
        assert_eq!(store.next_id(), ItemId::MAX);

        let err = store
            .create_at(NewItem::new("Overflow", "X"), 0)
            .expect_err("id space exhausted");
        assert_eq!(err, CatalogError::IdSpaceExhausted);
        assert_eq!(store.len(), 2);
        assert_eq!(store.next_id(), ItemId::MAX);
        let ids: Vec<_> = store.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![ItemId::MAX - 1, ItemId::MAX - 2]);
    }

    #[test]
    fn put_back_restores_removed_item_in_order() {
        let mut store = CatalogStore::new();
        for title in ["one", "two", "three"] {
            store.create_at(NewItem::new(title, "X"), 0).expect("create");
        }
        let removed = store.remove(2).expect("remove");
        store.put_back(removed);

        let ids: Vec<_> = store.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn failed_update_keeps_previous_value() {
        let mut store = CatalogStore::new();
        let created = store.create_at(NewItem::new("one", "X"), 0).expect("create");
        let err = store
            .update(created.id, &ItemPatch::new().title("   "))
            .expect_err("blank title");
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(store.get(created.id).expect("still there"), &created);
    }
}

//! Catalog use-case service.
//!
//! # Responsibility
//! - Load the catalog from a repository at startup.
//! - Apply mutations to the in-memory store and notify the repository.
//! - Emit metadata-only log events for every mutation.
//!
//! # Invariants
//! - A mutation is visible in the store only if the repository accepted it.
//!   Repository failures roll the store back to its prior state.
//! - Reads never touch the repository.

use crate::catalog::filter::ItemFilter;
use crate::catalog::store::{CatalogQuery, CatalogStats, CatalogStore};
use crate::catalog::{CatalogError, CatalogResult};
use crate::model::item::{Item, ItemId, ItemPatch, NewItem};
use crate::repo::item_repo::{ItemRepository, RepoError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Validation or lookup failure. Nothing was persisted.
    Catalog(CatalogError),
    /// Persistence failure. The store mutation was rolled back.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether this is the `NotFound` case of the catalog taxonomy.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::NotFound(_)))
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Catalog(CatalogError::Validation(_)) => "validation_failed",
            Self::Catalog(CatalogError::NotFound(_)) => "not_found",
            Self::Catalog(CatalogError::DuplicateId(_)) => "duplicate_id",
            Self::Catalog(CatalogError::IdSpaceExhausted) => "id_space_exhausted",
            Self::Repo(_) => "persistence_failed",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<CatalogError> for ServiceError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Catalog store paired with its persistence collaborator.
pub struct CatalogService<R: ItemRepository> {
    store: CatalogStore,
    repo: R,
}

impl<R: ItemRepository> CatalogService<R> {
    /// Loads the persisted snapshot and builds the store from it.
    pub fn open(repo: R) -> ServiceResult<Self> {
        let started_at = Instant::now();
        let snapshot = repo.load_catalog().map_err(|err| {
            error!(
                "event=catalog_open module=service status=error error_code=load_failed error={err}"
            );
            err
        })?;
        let store = CatalogStore::from_items(snapshot.items, snapshot.next_id)?;
        info!(
            "event=catalog_open module=service status=ok items={} next_id={} duration_ms={}",
            store.len(),
            store.next_id(),
            started_at.elapsed().as_millis()
        );
        Ok(Self { store, repo })
    }

    /// Read-only view of the underlying store.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn into_parts(self) -> (CatalogStore, R) {
        (self.store, self.repo)
    }

    /// Creates an item and persists it.
    ///
    /// On persistence failure the item is discarded again. Its id stays
    /// consumed.
    pub fn create(&mut self, input: NewItem) -> ServiceResult<Item> {
        let item = self
            .store
            .create(input)
            .map_err(|err| log_rejected("item_create", None, err.into()))?;

        if let Err(err) = self.repo.save_item(&item) {
            let rolled_back = self.store.remove(item.id);
            debug_assert!(rolled_back.is_ok(), "item {} vanished before rollback", item.id);
            return Err(log_failed("item_create", item.id, err.into()));
        }

        info!(
            "event=item_create module=service status=ok item_id={} tags={}",
            item.id,
            item.tags.len()
        );
        Ok(item)
    }

    /// Applies `patch` to an existing item and persists the result.
    pub fn update(&mut self, id: ItemId, patch: &ItemPatch) -> ServiceResult<Item> {
        let previous = self.lookup("item_update", id)?;
        let updated = self
            .store
            .update(id, patch)
            .map_err(|err| log_rejected("item_update", Some(id), err.into()))?;

        if let Err(err) = self.repo.save_item(&updated) {
            self.store.put_back(previous);
            return Err(log_failed("item_update", id, err.into()));
        }

        info!("event=item_update module=service status=ok item_id={id}");
        Ok(updated)
    }

    /// Removes an item and deletes it from persistence.
    pub fn remove(&mut self, id: ItemId) -> ServiceResult<Item> {
        let removed = self
            .store
            .remove(id)
            .map_err(|err| log_rejected("item_remove", Some(id), err.into()))?;

        if let Err(err) = self.repo.delete_item(id) {
            self.store.put_back(removed);
            return Err(log_failed("item_remove", id, err.into()));
        }

        info!("event=item_remove module=service status=ok item_id={id}");
        Ok(removed)
    }

    /// Increments the view counter of one item and persists it.
    pub fn record_view(&mut self, id: ItemId) -> ServiceResult<u64> {
        let previous = self.lookup("item_view", id)?;
        let views = self
            .store
            .record_view(id)
            .map_err(|err| log_rejected("item_view", Some(id), err.into()))?;

        let persisted = match self.store.get(id) {
            Ok(item) => self.repo.save_item(item),
            Err(err) => return Err(err.into()),
        };
        if let Err(err) = persisted {
            self.store.put_back(previous);
            return Err(log_failed("item_view", id, err.into()));
        }
        Ok(views)
    }

    pub fn get(&self, id: ItemId) -> CatalogResult<&Item> {
        self.store.get(id)
    }

    pub fn query(&self, search_text: &str, category: &str) -> CatalogQuery<'_> {
        self.store.query(search_text, category)
    }

    pub fn query_with(&self, filter: ItemFilter) -> CatalogQuery<'_> {
        self.store.query_with(filter)
    }

    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    pub fn stats(&self) -> CatalogStats {
        self.store.stats()
    }

    fn lookup(&self, event: &'static str, id: ItemId) -> ServiceResult<Item> {
        self.store
            .get(id)
            .cloned()
            .map_err(|err| log_rejected(event, Some(id), err.into()))
    }
}

fn log_rejected(event: &'static str, id: Option<ItemId>, err: ServiceError) -> ServiceError {
    match id {
        Some(id) => warn!(
            "event={event} module=service status=rejected item_id={id} error_code={}",
            err.code()
        ),
        None => warn!(
            "event={event} module=service status=rejected error_code={}",
            err.code()
        ),
    }
    err
}

fn log_failed(event: &'static str, id: ItemId, err: ServiceError) -> ServiceError {
    error!(
        "event={event} module=service status=error item_id={id} error_code={} error={err}",
        err.code()
    );
    err
}

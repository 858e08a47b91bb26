//! In-memory catalog store and its query filter.
//!
//! # Responsibility
//! - Own the authoritative set of items and allocate their ids.
//! - Apply create/update/remove mutations with all-or-nothing semantics.
//! - Answer text + category filter queries by linear scan.
//!
//! # Invariants
//! - The store assumes a single owner; mutations take `&mut self`.
//! - A failed operation leaves the store exactly as it was.

use crate::model::item::{ItemId, ItemValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod filter;
pub mod store;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error taxonomy for catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Input violates a field constraint. Store state is unchanged.
    Validation(ItemValidationError),
    /// Referenced id does not exist (or was removed).
    NotFound(ItemId),
    /// A snapshot handed to `CatalogStore::from_items` repeats an id.
    DuplicateId(ItemId),
    /// No id above the current high-water mark is left to allocate.
    IdSpaceExhausted,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate item id in catalog snapshot: {id}"),
            Self::IdSpaceExhausted => write!(f, "item id space exhausted"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) | Self::IdSpaceExhausted => None,
        }
    }
}

impl From<ItemValidationError> for CatalogError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

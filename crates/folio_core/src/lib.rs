//! Core domain logic for the Folio portfolio catalog.
//! This crate is the single source of truth for catalog invariants.

pub mod catalog;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod session;

pub use catalog::filter::{CategoryFilter, ItemFilter, ALL_CATEGORIES};
pub use catalog::store::{CatalogQuery, CatalogStats, CatalogStore, FIRST_ITEM_ID};
pub use catalog::{CatalogError, CatalogResult};
pub use config::{ConfigError, FolioConfig};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::item::{
    normalize_tags, now_epoch_ms, Item, ItemId, ItemPatch, ItemStatus, ItemValidationError,
    NewItem, TagsInput,
};
pub use repo::item_repo::{
    CatalogSnapshot, ItemRepository, RepoError, RepoResult, SqliteItemRepository,
};
pub use seed::{demo_items, seed_demo_catalog};
pub use service::catalog_service::{CatalogService, ServiceError, ServiceResult};
pub use session::{AdminCredentials, AdminSession, SessionError, DEFAULT_SESSION_TTL_MS};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

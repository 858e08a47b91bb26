//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `folio_core` linkage.
//! - Open the configured catalog, seed demo projects when it is empty, and
//!   print a deterministic summary.
//!
//! Usage: `folio_cli [config.json]`

use folio_core::db::{open_db, open_db_in_memory};
use folio_core::{
    demo_items, init_logging_from_config, CatalogService, FolioConfig, ItemFilter,
    SqliteItemRepository, ALL_CATEGORIES,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => FolioConfig::load(path)?,
        None => FolioConfig::default(),
    };
    init_logging_from_config(&config)?;

    println!("folio_core ping={}", folio_core::ping());
    println!("folio_core version={}", folio_core::core_version());

    let mut conn = match config.db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let repo = SqliteItemRepository::try_new(&mut conn)?;
    let mut service = CatalogService::open(repo)?;

    if service.store().is_empty() {
        for input in demo_items().into_iter().rev() {
            service.create(input)?;
        }
    }

    let stats = service.stats();
    println!(
        "catalog total={} published={} drafts={} featured={} views={}",
        stats.total, stats.published, stats.drafts, stats.featured, stats.total_views
    );

    let mut categories = vec![ALL_CATEGORIES.to_string()];
    categories.extend(service.categories());
    println!("categories={}", categories.join("|"));

    for item in service.query_with(ItemFilter::all().featured_only()) {
        println!("featured id={} title={}", item.id, item.title);
    }
    Ok(())
}

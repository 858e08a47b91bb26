//! Demo catalog content.
//!
//! The three sample projects the admin screen starts with. Used by the smoke
//! CLI and by tests that need a realistic catalog.

use crate::catalog::store::CatalogStore;
use crate::catalog::CatalogResult;
use crate::model::item::{Item, ItemStatus, NewItem};

/// Demo projects in display order (first entry shows first).
pub fn demo_items() -> Vec<NewItem> {
    vec![
        NewItem::new("E-commerce Platform", "Full Stack")
            .with_description("A full-featured online store with cart functionality")
            .with_long_description(
                "User authentication, product catalog with search and filtering, shopping \
                 cart, Stripe checkout and an admin panel for inventory management.",
            )
            .with_tags("React, Node.js, Stripe, MongoDB, Tailwind CSS")
            .with_image("🛍️")
            .featured(true)
            .with_status(ItemStatus::Published),
        NewItem::new("Task Management App", "Frontend")
            .with_description("Collaborative project management tool with real-time updates")
            .with_long_description(
                "Real-time collaboration, file sharing, time tracking and reporting for teams.",
            )
            .with_tags("Vue.js, Firebase, Vuex, PWA, WebSockets")
            .with_image("📋")
            .featured(true)
            .with_status(ItemStatus::Published),
        NewItem::new("Weather Dashboard", "Frontend")
            .with_description("Beautiful weather app with location-based forecasts")
            .with_long_description(
                "Current conditions, 7-day forecasts, interactive maps and weather analytics.",
            )
            .with_tags("React, API Integration, Charts.js, Geolocation, PWA")
            .with_image("🌤️"),
    ]
}

/// Creates the demo projects so they list in `demo_items()` order.
///
/// Queries yield newest first, so the items are created last-to-first.
pub fn seed_demo_catalog(store: &mut CatalogStore) -> CatalogResult<Vec<Item>> {
    let mut created = demo_items()
        .into_iter()
        .rev()
        .map(|input| store.create(input))
        .collect::<CatalogResult<Vec<_>>>()?;
    created.reverse();
    Ok(created)
}

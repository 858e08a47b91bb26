//! Text + category predicate used by catalog queries.

use crate::model::item::{Item, ItemStatus};

/// Category value that matches every item.
pub const ALL_CATEGORIES: &str = "all";

/// Category half of a catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive equality against `Item::category`.
    Exact(String),
}

impl CategoryFilter {
    /// Maps the `"all"` sentinel to [`CategoryFilter::All`]; anything else is
    /// an exact match.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => expected == category,
        }
    }
}

/// Predicate applied by `CatalogStore::query_with`.
///
/// Search text is matched case-insensitively as a substring of the title,
/// the description, or any single tag. Empty search text matches everything.
/// The text is not trimmed: a trailing space is part of the needle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    needle: String,
    category: CategoryFilter,
    featured_only: bool,
    status: Option<ItemStatus>,
}

impl ItemFilter {
    pub fn new(search_text: &str, category: &str) -> Self {
        Self {
            needle: search_text.to_lowercase(),
            category: CategoryFilter::parse(category),
            featured_only: false,
            status: None,
        }
    }

    /// Matches every item.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts results to items flagged `featured`.
    pub fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Restricts results to one publication status.
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Lowercased search text.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn matches(&self, item: &Item) -> bool {
        if self.featured_only && !item.featured {
            return false;
        }
        if self.status.is_some_and(|status| status != item.status) {
            return false;
        }
        self.category.matches(&item.category) && self.matches_text(item)
    }

    fn matches_text(&self, item: &Item) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        contains_folded(&item.title, &self.needle)
            || contains_folded(&item.description, &self.needle)
            || item.tags.iter().any(|tag| contains_folded(tag, &self.needle))
    }
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::{CategoryFilter, ItemFilter};
    use crate::model::item::{Item, ItemStatus, NewItem};

    fn item(title: &str, tags: &str, category: &str) -> Item {
        Item::from_input(1, NewItem::new(title, category).with_tags(tags), 0).expect("valid item")
    }

    #[test]
    fn sentinel_all_is_exact_lowercase_only() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("All"),
            CategoryFilter::Exact("All".to_string())
        );
    }

    #[test]
    fn text_matches_any_single_tag_case_insensitively() {
        let alpha = item("Alpha", "React, TypeScript", "Frontend");
        assert!(ItemFilter::new("SCRIPT", "all").matches(&alpha));
        assert!(!ItemFilter::new("react,type", "all").matches(&alpha));
    }

    #[test]
    fn category_is_case_sensitive() {
        let alpha = item("Alpha", "", "Frontend");
        assert!(ItemFilter::new("", "Frontend").matches(&alpha));
        assert!(!ItemFilter::new("", "frontend").matches(&alpha));
    }

    #[test]
    fn featured_and_status_restrictions_compose() {
        let mut alpha = item("Alpha", "", "Frontend");
        let filter = ItemFilter::all()
            .featured_only()
            .with_status(ItemStatus::Published);
        assert!(!filter.matches(&alpha));

        alpha.featured = true;
        alpha.status = ItemStatus::Published;
        assert!(filter.matches(&alpha));
    }
}

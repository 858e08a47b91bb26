//! Catalog item domain model.
//!
//! # Responsibility
//! - Define the canonical record for one portfolio project.
//! - Own tag normalization and field-level validation.
//! - Describe create input (`NewItem`) and partial updates (`ItemPatch`).
//!
//! # Invariants
//! - `id` is assigned by the catalog store and is never reused.
//! - `title` and `category` are non-empty and stored trimmed.
//! - `tags` never contains an empty or untrimmed entry.
//! - `id`, `created_at` and `views` are not replaceable through a patch.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned identifier. Allocation is monotonic and starts at 1.
pub type ItemId = u64;

/// Separator used by delimited tag input (`"React, Node.js"`).
pub const TAG_DELIMITER: char = ',';

/// Publication state of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Visible to admin tooling only.
    #[default]
    Draft,
    /// Visible on public listings.
    Published,
}

impl ItemStatus {
    /// Stable string form, shared by serde and SQLite storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Parses the stable string form. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            _ => None,
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures for item writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyTitle,
    EmptyCategory,
    /// A stored tag list contains a blank entry.
    EmptyTag,
    /// `title`, `category` or a tag carries leading or trailing whitespace.
    Untrimmed(&'static str),
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
            Self::EmptyTag => write!(f, "tags must not contain empty entries"),
            Self::Untrimmed(field) => {
                write!(f, "{field} must not have leading or trailing whitespace")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// One catalog entry (a portfolio project).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemWire")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    /// Detail text shown on the project page.
    pub long_description: String,
    /// Display order is insertion order; matching ignores order.
    pub tags: Vec<String>,
    pub category: String,
    /// Icon, emoji or image path.
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub status: ItemStatus,
    /// Only ever incremented, via `CatalogStore::record_view`.
    pub views: u64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Item {
    /// Builds a validated item from create input.
    ///
    /// `views` starts at 0. Text fields are normalized the same way
    /// [`Item::apply_patch`] normalizes them.
    pub fn from_input(
        id: ItemId,
        input: NewItem,
        created_at: i64,
    ) -> Result<Self, ItemValidationError> {
        let item = Self {
            id,
            title: input.title.trim().to_string(),
            description: input.description,
            long_description: input.long_description,
            tags: input.tags.normalize(),
            category: input.category.trim().to_string(),
            image: input.image.as_deref().and_then(normalize_optional_text),
            github_url: input.github_url.as_deref().and_then(normalize_optional_text),
            live_url: input.live_url.as_deref().and_then(normalize_optional_text),
            featured: input.featured,
            status: input.status,
            views: 0,
            created_at,
        };
        item.validate()?;
        Ok(item)
    }

    /// Returns a copy of this item with `patch` merged in.
    ///
    /// Fields absent from the patch keep their current value. The merged item
    /// is validated; `self` is never modified.
    pub fn apply_patch(&self, patch: &ItemPatch) -> Result<Self, ItemValidationError> {
        let mut next = self.clone();
        if let Some(title) = patch.title.as_deref() {
            next.title = title.trim().to_string();
        }
        if let Some(description) = patch.description.as_ref() {
            next.description = description.clone();
        }
        if let Some(long_description) = patch.long_description.as_ref() {
            next.long_description = long_description.clone();
        }
        if let Some(tags) = patch.tags.as_ref() {
            next.tags = tags.normalize();
        }
        if let Some(category) = patch.category.as_deref() {
            next.category = category.trim().to_string();
        }
        if let Some(image) = patch.image.as_deref() {
            next.image = normalize_optional_text(image);
        }
        if let Some(github_url) = patch.github_url.as_deref() {
            next.github_url = normalize_optional_text(github_url);
        }
        if let Some(live_url) = patch.live_url.as_deref() {
            next.live_url = normalize_optional_text(live_url);
        }
        if let Some(featured) = patch.featured {
            next.featured = featured;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        next.validate()?;
        Ok(next)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.title.trim().is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        if self.category.trim().is_empty() {
            return Err(ItemValidationError::EmptyCategory);
        }
        if self.tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ItemValidationError::EmptyTag);
        }
        if self.title.trim() != self.title {
            return Err(ItemValidationError::Untrimmed("title"));
        }
        if self.category.trim() != self.category {
            return Err(ItemValidationError::Untrimmed("category"));
        }
        if self.tags.iter().any(|tag| tag.trim() != tag) {
            return Err(ItemValidationError::Untrimmed("tags"));
        }
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == ItemStatus::Published
    }
}

// Deserialization goes through this shape so decoded items obey `validate()`.
#[derive(Deserialize)]
struct ItemWire {
    id: ItemId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    long_description: String,
    #[serde(default)]
    tags: Vec<String>,
    category: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    github_url: Option<String>,
    #[serde(default)]
    live_url: Option<String>,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    status: ItemStatus,
    #[serde(default)]
    views: u64,
    created_at: i64,
}

impl TryFrom<ItemWire> for Item {
    type Error = ItemValidationError;

    fn try_from(wire: ItemWire) -> Result<Self, Self::Error> {
        let item = Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            long_description: wire.long_description,
            tags: wire.tags,
            category: wire.category,
            image: wire.image,
            github_url: wire.github_url,
            live_url: wire.live_url,
            featured: wire.featured,
            status: wire.status,
            views: wire.views,
            created_at: wire.created_at,
        };
        item.validate()?;
        Ok(item)
    }
}

/// Tag input as accepted by create/update.
///
/// The admin form submits a comma separated string; programmatic callers
/// usually hold a list. Both normalize identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsInput {
    Delimited(String),
    List(Vec<String>),
}

impl TagsInput {
    /// Trims every entry and drops empties, preserving order.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Delimited(raw) => normalize_tags(raw.split(TAG_DELIMITER)),
            Self::List(values) => normalize_tags(values.iter().map(String::as_str)),
        }
    }
}

impl Default for TagsInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<&str> for TagsInput {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

impl From<String> for TagsInput {
    fn from(value: String) -> Self {
        Self::Delimited(value)
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for TagsInput {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TagsInput {
    fn from(values: &[&str]) -> Self {
        Self::List(values.iter().map(|value| value.to_string()).collect())
    }
}

/// Trims each tag and discards empties. Duplicates are kept as given.
pub fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Blank optional text (`""`, `"   "`) is stored as `None`.
fn normalize_optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Create input: every item field except `id`, `created_at` and `views`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub tags: TagsInput,
    pub category: String,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: bool,
    pub status: ItemStatus,
}

impl NewItem {
    /// Starts a draft, non-featured item with the two required fields.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_long_description(mut self, long_description: impl Into<String>) -> Self {
        self.long_description = long_description.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<TagsInput>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_links(mut self, github_url: impl Into<String>, live_url: impl Into<String>) -> Self {
        self.github_url = Some(github_url.into());
        self.live_url = Some(live_url.into());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update for an existing item.
///
/// `None` keeps the current value. For the optional text fields
/// (`image`, `github_url`, `live_url`) a blank string clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub tags: Option<TagsInput>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub featured: Option<bool>,
    pub status: Option<ItemStatus>,
}

impl ItemPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn long_description(mut self, long_description: impl Into<String>) -> Self {
        self.long_description = Some(long_description.into());
        self
    }

    pub fn tags(mut self, tags: impl Into<TagsInput>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Pass `""` to clear the image.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn github_url(mut self, github_url: impl Into<String>) -> Self {
        self.github_url = Some(github_url.into());
        self
    }

    pub fn live_url(mut self, live_url: impl Into<String>) -> Self {
        self.live_url = Some(live_url.into());
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Falls back to `0` if the system clock reads earlier than the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load the persisted catalog snapshot at startup.
//! - Persist each accepted mutation (upsert or delete).
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Item::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `item_sequence.next_id` never decreases.

use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemStatus};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    long_description,
    category,
    image,
    github_url,
    live_url,
    featured,
    status,
    views,
    created_at
FROM items";

const REQUIRED_TABLES: [&str; 3] = ["items", "item_tags", "item_sequence"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and loading.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ItemId),
    InvalidData(String),
    /// Connection was not migrated before the repository was built.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persisted catalog state handed to the store at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    /// Items in ascending id order.
    pub items: Vec<Item>,
    /// Allocation high-water mark; ids below it were handed out before.
    pub next_id: ItemId,
}

/// Persistence collaborator notified after each catalog mutation.
pub trait ItemRepository {
    fn load_catalog(&self) -> RepoResult<CatalogSnapshot>;
    /// Inserts or fully replaces one item, including its tag list.
    fn save_item(&mut self, item: &Item) -> RepoResult<()>;
    fn delete_item(&mut self, id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when the catalog schema is absent.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn load_catalog(&self) -> RepoResult<CatalogSnapshot> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let mut item = parse_item_row(row)?;
            item.tags = load_tags(self.conn, item.id)?;
            item.validate().map_err(|err| {
                RepoError::InvalidData(format!("item {} failed validation: {err}", item.id))
            })?;
            items.push(item);
        }

        let next_id: i64 = self.conn.query_row(
            "SELECT next_id FROM item_sequence WHERE singleton = 1;",
            [],
            |row| row.get(0),
        )?;
        Ok(CatalogSnapshot {
            items,
            next_id: id_from_db(next_id, "item_sequence.next_id")?,
        })
    }

    fn save_item(&mut self, item: &Item) -> RepoResult<()> {
        item.validate().map_err(|err| {
            RepoError::InvalidData(format!("refusing to save item {}: {err}", item.id))
        })?;
        let id = id_to_db(item.id)?;
        let views = i64::try_from(item.views).map_err(|_| {
            RepoError::InvalidData(format!("views {} out of range for item {}", item.views, item.id))
        })?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO items (
                id,
                title,
                description,
                long_description,
                category,
                image,
                github_url,
                live_url,
                featured,
                status,
                views,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT (id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                long_description = excluded.long_description,
                category = excluded.category,
                image = excluded.image,
                github_url = excluded.github_url,
                live_url = excluded.live_url,
                featured = excluded.featured,
                status = excluded.status,
                views = excluded.views,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                id,
                item.title.as_str(),
                item.description.as_str(),
                item.long_description.as_str(),
                item.category.as_str(),
                item.image.as_deref(),
                item.github_url.as_deref(),
                item.live_url.as_deref(),
                bool_to_int(item.featured),
                item.status.as_str(),
                views,
                item.created_at,
            ],
        )?;
        replace_tags_in_tx(&tx, id, &item.tags)?;
        tx.execute(
            "UPDATE item_sequence
             SET next_id = MAX(next_id, ?1 + 1)
             WHERE singleton = 1;",
            [id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_item(&mut self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id_to_db(id)?])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn replace_tags_in_tx(tx: &Transaction<'_>, item_id: i64, tags: &[String]) -> RepoResult<()> {
    tx.execute("DELETE FROM item_tags WHERE item_id = ?1;", [item_id])?;
    let mut insert =
        tx.prepare("INSERT INTO item_tags (item_id, position, name) VALUES (?1, ?2, ?3);")?;
    for (position, tag) in (0_i64..).zip(tags) {
        insert.execute(params![item_id, position, tag.as_str()])?;
    }
    Ok(())
}

fn load_tags(conn: &Connection, item_id: ItemId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM item_tags
         WHERE item_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id_to_db(item_id)?])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id = id_from_db(row.get("id")?, "items.id")?;

    let status_text: String = row.get("status")?;
    let status = ItemStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in items.status"))
    })?;

    let featured = match row.get::<_, i64>("featured")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid featured value `{other}` in items.featured"
            )));
        }
    };

    let views_raw: i64 = row.get("views")?;
    let views = u64::try_from(views_raw).map_err(|_| {
        RepoError::InvalidData(format!("negative views `{views_raw}` in items.views"))
    })?;

    Ok(Item {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        long_description: row.get("long_description")?,
        tags: Vec::new(),
        category: row.get("category")?,
        image: row.get("image")?,
        github_url: row.get("github_url")?,
        live_url: row.get("live_url")?,
        featured,
        status,
        views,
        created_at: row.get("created_at")?,
    })
}

fn id_to_db(id: ItemId) -> RepoResult<i64> {
    i64::try_from(id).map_err(|_| RepoError::InvalidData(format!("item id {id} exceeds i64")))
}

fn id_from_db(value: i64, column: &str) -> RepoResult<ItemId> {
    ItemId::try_from(value)
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid id `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

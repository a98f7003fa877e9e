//! Item repository contract and SQLite implementation.
//!
//! # Invariants
//! - Deleting an item deletes its attributes in the same statement sequence.
//! - Unsorted listing follows insertion order.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::item::{Item, ItemId};
use crate::query::sort::SortDirection;
use rusqlite::{params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT item_uuid, name, sort_order FROM items";

/// Ordering applied when fetching items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemOrdering {
    /// Storage insertion order.
    #[default]
    Insertion,
    /// By `order`, ties by insertion.
    Order(SortDirection),
    /// By `name`, ties by insertion.
    Name(SortDirection),
}

/// Fetch options for listing items.
#[derive(Debug, Clone, Default)]
pub struct ItemFetch {
    pub ordering: ItemOrdering,
    pub limit: Option<u32>,
}

impl ItemFetch {
    /// Fetch sorted by `order` ascending.
    pub fn by_order() -> Self {
        Self {
            ordering: ItemOrdering::Order(SortDirection::Forward),
            limit: None,
        }
    }
}

/// Repository interface for item persistence.
pub trait ItemRepository {
    fn insert_item(&self, item: &Item) -> RepoResult<ItemId>;
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    fn list_items(&self, fetch: &ItemFetch) -> RepoResult<Vec<Item>>;
    /// Deletes the item and its attributes, returning the attribute count removed.
    fn delete_item(&self, id: ItemId) -> RepoResult<usize>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn insert_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO items (item_uuid, name, sort_order) VALUES (?1, ?2, ?3);",
            params![item.id.to_string(), item.name.as_str(), item.order],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                name = ?1,
                sort_order = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE item_uuid = ?3;",
            params![item.name.as_str(), item.order, item.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(item.id));
        }
        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE item_uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(read_item_columns(row)?.into_item()?));
        }
        Ok(None)
    }

    fn list_items(&self, fetch: &ItemFetch) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} ORDER BY ");
        sql.push_str(match fetch.ordering {
            ItemOrdering::Insertion => "rowid ASC",
            ItemOrdering::Order(SortDirection::Forward) => "sort_order ASC, rowid ASC",
            ItemOrdering::Order(SortDirection::Reverse) => "sort_order DESC, rowid ASC",
            ItemOrdering::Name(SortDirection::Forward) => "name ASC, rowid ASC",
            ItemOrdering::Name(SortDirection::Reverse) => "name DESC, rowid ASC",
        });
        if let Some(limit) = fetch.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(read_item_columns(row)?.into_item()?);
        }
        Ok(items)
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<usize> {
        let removed_attributes = self.conn.execute(
            "DELETE FROM attributes WHERE item_uuid = ?1;",
            [id.to_string()],
        )?;
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE item_uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(id));
        }
        Ok(removed_attributes)
    }
}

struct ItemColumns {
    uuid: String,
    name: String,
    order: i64,
}

impl ItemColumns {
    fn into_item(self) -> RepoResult<Item> {
        let id = parse_uuid(&self.uuid, "items.item_uuid")?;
        Ok(Item::with_id(id, self.name, self.order))
    }
}

fn read_item_columns(row: &Row<'_>) -> RepoResult<ItemColumns> {
    Ok(ItemColumns {
        uuid: row.get("item_uuid")?,
        name: row.get("name")?,
        order: row.get("sort_order")?,
    })
}

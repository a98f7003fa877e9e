//! Attribute repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist attributes under an existing parent item.
//! - Read attributes joined with their parent as `AttributeRecord`.
//!
//! # Invariants
//! - Writes never leave an attribute pointing at a missing item.
//! - Listing follows insertion order; callers apply their own sort.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::attribute::{Attribute, AttributeId, AttributeRecord};
use crate::model::item::{Item, ItemId};
use rusqlite::{params, Connection, Row};

const RECORD_SELECT_SQL: &str = "SELECT
    a.attribute_uuid AS attribute_uuid,
    a.item_uuid AS item_uuid,
    a.name AS attribute_name,
    a.sort_order AS attribute_order,
    i.name AS item_name,
    i.sort_order AS item_order
FROM attributes a
JOIN items i ON i.item_uuid = a.item_uuid";

/// Repository interface for attribute persistence.
pub trait AttributeRepository {
    fn insert_attribute(&self, attribute: &Attribute) -> RepoResult<AttributeId>;
    fn update_attribute(&self, attribute: &Attribute) -> RepoResult<()>;
    fn get_attribute(&self, id: AttributeId) -> RepoResult<Option<AttributeRecord>>;
    /// Lists every attribute joined with its item, in insertion order.
    fn list_attributes(&self) -> RepoResult<Vec<AttributeRecord>>;
    fn list_attributes_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Attribute>>;
    fn delete_attribute(&self, id: AttributeId) -> RepoResult<()>;
}

/// SQLite-backed attribute repository.
pub struct SqliteAttributeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttributeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn ensure_item_exists(&self, item_id: ItemId) -> RepoResult<()> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM items WHERE item_uuid = ?1);",
            [item_id.to_string()],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::ItemNotFound(item_id));
        }
        Ok(())
    }

    fn query_records(&self, sql: &str, bind: Option<String>) -> RepoResult<Vec<AttributeRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match bind {
            Some(value) => stmt.query([value])?,
            None => stmt.query([])?,
        };
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

impl AttributeRepository for SqliteAttributeRepository<'_> {
    fn insert_attribute(&self, attribute: &Attribute) -> RepoResult<AttributeId> {
        attribute.validate()?;
        self.ensure_item_exists(attribute.item_id)?;

        self.conn.execute(
            "INSERT INTO attributes (attribute_uuid, item_uuid, name, sort_order)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                attribute.id.to_string(),
                attribute.item_id.to_string(),
                attribute.name.as_str(),
                attribute.order,
            ],
        )?;

        Ok(attribute.id)
    }

    fn update_attribute(&self, attribute: &Attribute) -> RepoResult<()> {
        attribute.validate()?;
        self.ensure_item_exists(attribute.item_id)?;

        let changed = self.conn.execute(
            "UPDATE attributes
             SET
                item_uuid = ?1,
                name = ?2,
                sort_order = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE attribute_uuid = ?4;",
            params![
                attribute.item_id.to_string(),
                attribute.name.as_str(),
                attribute.order,
                attribute.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::AttributeNotFound(attribute.id));
        }
        Ok(())
    }

    fn get_attribute(&self, id: AttributeId) -> RepoResult<Option<AttributeRecord>> {
        let records = self.query_records(
            &format!("{RECORD_SELECT_SQL} WHERE a.attribute_uuid = ?1;"),
            Some(id.to_string()),
        )?;
        Ok(records.into_iter().next())
    }

    fn list_attributes(&self) -> RepoResult<Vec<AttributeRecord>> {
        self.query_records(&format!("{RECORD_SELECT_SQL} ORDER BY a.rowid ASC;"), None)
    }

    fn list_attributes_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Attribute>> {
        let records = self.query_records(
            &format!("{RECORD_SELECT_SQL} WHERE a.item_uuid = ?1 ORDER BY a.rowid ASC;"),
            Some(item_id.to_string()),
        )?;
        Ok(records.into_iter().map(|record| record.attribute).collect())
    }

    fn delete_attribute(&self, id: AttributeId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM attributes WHERE attribute_uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::AttributeNotFound(id));
        }
        Ok(())
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<AttributeRecord> {
    let attribute_uuid: String = row.get("attribute_uuid")?;
    let item_uuid: String = row.get("item_uuid")?;
    let item_id = parse_uuid(&item_uuid, "attributes.item_uuid")?;

    let attribute = Attribute {
        id: parse_uuid(&attribute_uuid, "attributes.attribute_uuid")?,
        item_id,
        name: row.get("attribute_name")?,
        order: row.get("attribute_order")?,
    };
    let item = Item::with_id(item_id, row.get::<_, String>("item_name")?, row.get("item_order")?);

    Ok(AttributeRecord { attribute, item })
}

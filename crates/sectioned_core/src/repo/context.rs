//! Unit-of-work context over the record store.
//!
//! # Responsibility
//! - Offer insert/update/delete/fetch/save over items and attributes.
//! - Group writes into one SQLite transaction that `save()` commits.
//! - Notify in-process observers after each successful save.
//!
//! # Invariants
//! - Reads observe pending (unsaved) writes of the same context.
//! - A context owns its connection exclusively; it is not shared across threads.
//! - Pending writes are rolled back when the context is dropped unsaved.

use super::attribute_repo::{AttributeRepository, SqliteAttributeRepository};
use super::item_repo::{ItemFetch, ItemRepository, SqliteItemRepository};
use super::RepoResult;
use crate::db::{open_db, open_db_in_memory};
use crate::model::attribute::{Attribute, AttributeId, AttributeRecord};
use crate::model::item::{Item, ItemId};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

/// Counts of writes committed by one `save()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    /// Includes attributes removed by item cascade.
    pub deleted: usize,
}

impl SaveSummary {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.deleted == 0
    }
}

type SaveObserver = Box<dyn FnMut(&SaveSummary)>;

/// Record store context: the persistence collaborator used by grouped queries.
pub struct ModelContext {
    conn: Connection,
    pending: SaveSummary,
    observers: Vec<SaveObserver>,
}

impl ModelContext {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            pending: SaveSummary::default(),
            observers: Vec::new(),
        }
    }

    /// Opens (creating if needed) a file-backed store.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens an empty in-memory store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Read-only access to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Registers an observer invoked after every non-empty successful save.
    pub fn on_did_save(&mut self, observer: impl FnMut(&SaveSummary) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Whether unsaved writes exist.
    pub fn has_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    pub fn fetch_items(&self, fetch: &ItemFetch) -> RepoResult<Vec<Item>> {
        SqliteItemRepository::new(&self.conn).list_items(fetch)
    }

    pub fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        SqliteItemRepository::new(&self.conn).get_item(id)
    }

    /// All attributes joined with their item, in insertion order.
    pub fn fetch_attributes(&self) -> RepoResult<Vec<AttributeRecord>> {
        SqliteAttributeRepository::new(&self.conn).list_attributes()
    }

    pub fn fetch_attributes_for_item(&self, item_id: ItemId) -> RepoResult<Vec<Attribute>> {
        SqliteAttributeRepository::new(&self.conn).list_attributes_for_item(item_id)
    }

    pub fn get_attribute(&self, id: AttributeId) -> RepoResult<Option<AttributeRecord>> {
        SqliteAttributeRepository::new(&self.conn).get_attribute(id)
    }

    pub fn insert_item(&mut self, item: &Item) -> RepoResult<ItemId> {
        let id = self.write(|conn| SqliteItemRepository::new(conn).insert_item(item))?;
        self.pending.inserted += 1;
        Ok(id)
    }

    pub fn update_item(&mut self, item: &Item) -> RepoResult<()> {
        self.write(|conn| SqliteItemRepository::new(conn).update_item(item))?;
        self.pending.updated += 1;
        Ok(())
    }

    /// Deletes an item and its attributes; returns the number of attributes removed.
    pub fn delete_item(&mut self, id: ItemId) -> RepoResult<usize> {
        let removed = self.write(|conn| SqliteItemRepository::new(conn).delete_item(id))?;
        self.pending.deleted += removed + 1;
        debug!("event=item_delete module=repo status=ok cascade_attributes={removed}");
        Ok(removed)
    }

    /// Inserts an attribute; the parent item must already exist in this context.
    pub fn insert_attribute(&mut self, attribute: &Attribute) -> RepoResult<AttributeId> {
        let id =
            self.write(|conn| SqliteAttributeRepository::new(conn).insert_attribute(attribute))?;
        self.pending.inserted += 1;
        Ok(id)
    }

    pub fn update_attribute(&mut self, attribute: &Attribute) -> RepoResult<()> {
        self.write(|conn| SqliteAttributeRepository::new(conn).update_attribute(attribute))?;
        self.pending.updated += 1;
        Ok(())
    }

    pub fn delete_attribute(&mut self, id: AttributeId) -> RepoResult<()> {
        self.write(|conn| SqliteAttributeRepository::new(conn).delete_attribute(id))?;
        self.pending.deleted += 1;
        Ok(())
    }

    /// Commits pending writes.
    ///
    /// Returns an empty summary without notifying observers when nothing is
    /// pending.
    ///
    /// # Errors
    /// - Returns `RepoError::Db` when the commit fails; pending writes stay
    ///   open so the caller may `rollback()`.
    pub fn save(&mut self) -> RepoResult<SaveSummary> {
        if self.conn.is_autocommit() {
            return Ok(SaveSummary::default());
        }

        let started_at = Instant::now();
        if let Err(err) = self.conn.execute_batch("COMMIT;") {
            error!(
                "event=context_save module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        let summary = std::mem::take(&mut self.pending);
        info!(
            "event=context_save module=repo status=ok duration_ms={} inserted={} updated={} deleted={}",
            started_at.elapsed().as_millis(),
            summary.inserted,
            summary.updated,
            summary.deleted
        );
        if !summary.is_empty() {
            for observer in &mut self.observers {
                observer(&summary);
            }
        }
        Ok(summary)
    }

    /// Discards pending writes. No-op when nothing is pending.
    pub fn rollback(&mut self) -> RepoResult<()> {
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK;")?;
        self.pending = SaveSummary::default();
        info!("event=context_rollback module=repo status=ok");
        Ok(())
    }

    // A rejected first write closes the transaction it opened, so
    // `has_changes()` only reports writes that actually happened.
    fn write<T>(&self, op: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let opened = self.conn.is_autocommit();
        if opened {
            self.conn.execute_batch("BEGIN;")?;
        }

        let result = op(&self.conn);
        if result.is_err() && opened {
            if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
                error!("event=context_write module=repo status=error error_code=rollback_failed error={err}");
            }
        }
        result
    }
}

impl Drop for ModelContext {
    fn drop(&mut self) {
        if self.conn.is_autocommit() {
            return;
        }
        warn!("event=context_drop module=repo status=discarded_unsaved_changes");
        if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
            error!("event=context_drop module=repo status=error error={err}");
        }
    }
}

//! Parent record.

use super::{validate_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an `Item`.
pub type ItemId = Uuid;

/// Parent record that owns zero or more attributes.
///
/// Deleting an item deletes every attribute that refers to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Plain ordering key; duplicates are allowed.
    pub order: i64,
}

impl Item {
    /// Creates a new item with a generated id.
    pub fn new(name: impl Into<String>, order: i64) -> Self {
        Self::with_id(Uuid::new_v4(), name, order)
    }

    /// Creates an item with a caller-provided id.
    pub fn with_id(id: ItemId, name: impl Into<String>, order: i64) -> Self {
        Self {
            id,
            name: name.into(),
            order,
        }
    }

    /// Checks field invariants required before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

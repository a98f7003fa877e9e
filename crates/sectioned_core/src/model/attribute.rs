//! Child record and its joined read model.

use super::item::{Item, ItemId};
use super::{validate_name, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an `Attribute`.
pub type AttributeId = Uuid;

/// Child record belonging to exactly one `Item`.
///
/// `item_id` is a non-owning back-reference; the item owns the attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub id: AttributeId,
    pub item_id: ItemId,
    pub name: String,
    pub order: i64,
}

impl Attribute {
    /// Creates a new attribute for `item` with a generated id.
    pub fn new(item: &Item, name: impl Into<String>, order: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            name: name.into(),
            order,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)
    }
}

/// Attribute joined with a snapshot of its parent item.
///
/// This is the row shape grouped queries sort, filter and section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub attribute: Attribute,
    pub item: Item,
}

impl AttributeRecord {
    /// Row label in the form `Item[<order>] '<name>' Attribute[<order>]`.
    pub fn label(&self) -> String {
        format!(
            "Item[{}] '{}' Attribute[{}]",
            self.item.order, self.item.name, self.attribute.order
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Attribute, AttributeRecord};
    use crate::model::item::Item;

    #[test]
    fn new_attribute_points_at_parent() {
        let item = Item::new("Z", 0);
        let attribute = Attribute::new(&item, "Z.0", 0);
        assert_eq!(attribute.item_id, item.id);
    }

    #[test]
    fn label_reads_parent_fields() {
        let item = Item::new("Y", 1);
        let attribute = Attribute::new(&item, "Y.2", 2);
        let record = AttributeRecord { attribute, item };
        assert_eq!(record.label(), "Item[1] 'Y' Attribute[2]");
    }
}

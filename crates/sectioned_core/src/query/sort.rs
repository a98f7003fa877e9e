//! Multi-field sort descriptors for attribute records.

use crate::model::attribute::AttributeRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction of one descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Forward,
    Reverse,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Forward => ordering,
            Self::Reverse => ordering.reverse(),
        }
    }
}

/// Field of an `AttributeRecord` that can drive sorting or sectioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Parent `item.order`.
    ItemOrder,
    /// Parent `item.name`.
    ItemName,
    /// `attribute.order`.
    AttributeOrder,
    /// `attribute.name`.
    AttributeName,
}

impl SortField {
    /// Ascending comparison of two records on this field.
    pub fn compare(self, left: &AttributeRecord, right: &AttributeRecord) -> Ordering {
        match self {
            Self::ItemOrder => left.item.order.cmp(&right.item.order),
            Self::ItemName => left.item.name.cmp(&right.item.name),
            Self::AttributeOrder => left.attribute.order.cmp(&right.attribute.order),
            Self::AttributeName => left.attribute.name.cmp(&right.attribute.name),
        }
    }

    /// String rendering of the field value, used as a section id.
    pub fn key_of(self, record: &AttributeRecord) -> String {
        match self {
            Self::ItemOrder => record.item.order.to_string(),
            Self::ItemName => record.item.name.clone(),
            Self::AttributeOrder => record.attribute.order.to_string(),
            Self::AttributeName => record.attribute.name.clone(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ItemOrder => "item.order",
            Self::ItemName => "item.name",
            Self::AttributeOrder => "attribute.order",
            Self::AttributeName => "attribute.name",
        }
    }
}

/// One `(field, direction)` entry of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn forward(field: SortField) -> Self {
        Self::new(field, SortDirection::Forward)
    }

    pub fn reverse(field: SortField) -> Self {
        Self::new(field, SortDirection::Reverse)
    }

    pub fn compare(&self, left: &AttributeRecord, right: &AttributeRecord) -> Ordering {
        self.direction.apply(self.field.compare(left, right))
    }
}

/// Compares two records field by field; the first non-equal field decides.
pub fn compare_records(
    sort: &[SortDescriptor],
    left: &AttributeRecord,
    right: &AttributeRecord,
) -> Ordering {
    sort.iter()
        .map(|descriptor| descriptor.compare(left, right))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable sort; records tied on every descriptor keep their input order.
pub fn sort_records(records: &mut [AttributeRecord], sort: &[SortDescriptor]) {
    if sort.is_empty() {
        return;
    }
    records.sort_by(|left, right| compare_records(sort, left, right));
}

//! Derived section identifiers.

use super::sort::SortField;
use crate::model::attribute::AttributeRecord;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

#[derive(Clone)]
enum KeySource {
    Field(SortField),
    Custom(Rc<dyn Fn(&AttributeRecord) -> String>),
}

/// Computes the section id of a record.
///
/// Field-backed keys can be checked against the primary sort field; custom
/// keys cannot, and keeping them contiguous is up to the caller.
#[derive(Clone)]
pub struct SectionKey {
    label: String,
    source: KeySource,
}

impl SectionKey {
    pub fn field(field: SortField) -> Self {
        Self {
            label: field.as_str().to_string(),
            source: KeySource::Field(field),
        }
    }

    pub fn item_name() -> Self {
        Self::field(SortField::ItemName)
    }

    pub fn item_order() -> Self {
        Self::field(SortField::ItemOrder)
    }

    pub fn attribute_name() -> Self {
        Self::field(SortField::AttributeName)
    }

    pub fn attribute_order() -> Self {
        Self::field(SortField::AttributeOrder)
    }

    pub fn custom(
        label: impl Into<String>,
        key: impl Fn(&AttributeRecord) -> String + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            source: KeySource::Custom(Rc::new(key)),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Backing field, or `None` for custom keys.
    pub fn backing_field(&self) -> Option<SortField> {
        match self.source {
            KeySource::Field(field) => Some(field),
            KeySource::Custom(_) => None,
        }
    }

    pub fn key_of(&self, record: &AttributeRecord) -> String {
        match &self.source {
            KeySource::Field(field) => field.key_of(record),
            KeySource::Custom(key) => key(record),
        }
    }
}

impl Debug for SectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SectionKey").field(&self.label).finish()
    }
}

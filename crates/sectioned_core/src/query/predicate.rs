//! Boolean filters applied to attribute records before grouping.

use crate::model::attribute::AttributeRecord;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Labelled record filter.
///
/// The label identifies the predicate in logs and debug output; two
/// predicates are never compared by behavior.
#[derive(Clone)]
pub struct Predicate {
    label: String,
    test: Rc<dyn Fn(&AttributeRecord) -> bool>,
}

impl Predicate {
    pub fn new(label: impl Into<String>, test: impl Fn(&AttributeRecord) -> bool + 'static) -> Self {
        Self {
            label: label.into(),
            test: Rc::new(test),
        }
    }

    /// `attribute.order == order`.
    pub fn attribute_order_eq(order: i64) -> Self {
        Self::new(format!("attribute.order == {order}"), move |record| {
            record.attribute.order == order
        })
    }

    /// Keeps only the first attribute (`order == 0`) of each item.
    pub fn first_attribute() -> Self {
        Self::attribute_order_eq(0)
    }

    pub fn item_name_eq(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(format!("item.name == {name:?}"), move |record| {
            record.item.name == name
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, record: &AttributeRecord) -> bool {
        (self.test)(record)
    }
}

impl Debug for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Predicate;
    use crate::model::attribute::{Attribute, AttributeRecord};
    use crate::model::item::Item;

    #[test]
    fn first_attribute_matches_order_zero_only() {
        let item = Item::new("Z", 0);
        let first = AttributeRecord {
            attribute: Attribute::new(&item, "Z.0", 0),
            item: item.clone(),
        };
        let second = AttributeRecord {
            attribute: Attribute::new(&item, "Z.1", 1),
            item,
        };

        let predicate = Predicate::first_attribute();
        assert!(predicate.matches(&first));
        assert!(!predicate.matches(&second));
        assert_eq!(predicate.label(), "attribute.order == 0");
    }
}

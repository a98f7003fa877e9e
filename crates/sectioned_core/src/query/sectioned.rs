//! Sectioned query configuration, derivation and live view.
//!
//! # Responsibility
//! - Hold section key, sort and predicate configuration.
//! - Derive `Section`s from a record snapshot (filter, sort, group).
//! - Re-derive synchronously whenever the live view's configuration changes.
//!
//! # Invariants
//! - Derivation is a pure function of records and configuration.
//! - No configuration setter on `SectionedView` returns before the snapshot
//!   reflects the new configuration.

use super::predicate::Predicate;
use super::section_key::SectionKey;
use super::sort::{sort_records, SortDescriptor, SortField};
use crate::model::attribute::AttributeRecord;
use crate::repo::context::ModelContext;
use crate::repo::RepoResult;
use log::{debug, warn};
use serde::Serialize;

/// Group of consecutive records sharing one section key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub items: Vec<AttributeRecord>,
}

impl Section {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Supplier of the records a sectioned query derives from.
pub trait AttributeSource {
    fn fetch_attribute_records(&self) -> RepoResult<Vec<AttributeRecord>>;
}

impl AttributeSource for ModelContext {
    fn fetch_attribute_records(&self) -> RepoResult<Vec<AttributeRecord>> {
        self.fetch_attributes()
    }
}

/// Filters, sorts and groups `records`.
///
/// Records tied on every sort descriptor keep their input order. Sections are
/// cut wherever the key changes between neighbours.
pub fn derive_sections(
    mut records: Vec<AttributeRecord>,
    section_key: &SectionKey,
    sort: &[SortDescriptor],
    predicate: Option<&Predicate>,
) -> Vec<Section> {
    if let Some(predicate) = predicate {
        records.retain(|record| predicate.matches(record));
    }
    sort_records(&mut records, sort);

    let mut sections: Vec<Section> = Vec::new();
    for record in records {
        let id = section_key.key_of(&record);
        match sections.last_mut() {
            Some(section) if section.id == id => section.items.push(record),
            _ => sections.push(Section {
                id,
                items: vec![record],
            }),
        }
    }
    sections
}

/// Section key, sort and optional predicate of a grouped query.
#[derive(Debug, Clone)]
pub struct SectionedQuery {
    section_key: SectionKey,
    sort: Vec<SortDescriptor>,
    predicate: Option<Predicate>,
}

impl Default for SectionedQuery {
    /// One section per item, items by `item.order`, attributes by `attribute.order`.
    fn default() -> Self {
        Self::new(
            SectionKey::item_name(),
            vec![
                SortDescriptor::forward(SortField::ItemOrder),
                SortDescriptor::forward(SortField::AttributeOrder),
            ],
        )
    }
}

impl SectionedQuery {
    pub fn new(section_key: SectionKey, sort: Vec<SortDescriptor>) -> Self {
        Self {
            section_key,
            sort,
            predicate: None,
        }
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn section_key(&self) -> &SectionKey {
        &self.section_key
    }

    pub fn sort(&self) -> &[SortDescriptor] {
        &self.sort
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    /// Whether sections are guaranteed contiguous under the current sort.
    ///
    /// Holds only when the key's field is the primary sort field. The default
    /// `item.name` key under an `item.order` sort stays contiguous only while
    /// item names and orders are both unique, so it is not reported here.
    /// Custom keys are never reported consistent.
    pub fn is_key_consistent(&self) -> bool {
        match (self.section_key.backing_field(), self.sort.first()) {
            (Some(key_field), Some(primary)) => key_field == primary.field,
            _ => false,
        }
    }

    pub fn derive(&self, records: Vec<AttributeRecord>) -> Vec<Section> {
        derive_sections(
            records,
            &self.section_key,
            &self.sort,
            self.predicate.as_ref(),
        )
    }

    /// Fetches records from `source` and derives sections.
    pub fn sections(&self, source: &impl AttributeSource) -> RepoResult<Vec<Section>> {
        Ok(self.derive(source.fetch_attribute_records()?))
    }
}

/// Sectioned query with its latest derived snapshot.
#[derive(Debug, Clone)]
pub struct SectionedView {
    query: SectionedQuery,
    sections: Vec<Section>,
}

impl SectionedView {
    /// Builds a view and derives its first snapshot from `source`.
    pub fn new(query: SectionedQuery, source: &impl AttributeSource) -> RepoResult<Self> {
        let mut view = Self {
            query,
            sections: Vec::new(),
        };
        view.refresh(source)?;
        Ok(view)
    }

    pub fn query(&self) -> &SectionedQuery {
        &self.query
    }

    /// Latest derived sections.
    pub fn current_sections(&self) -> &[Section] {
        &self.sections
    }

    /// Re-derives the snapshot from the source's current contents.
    pub fn refresh(&mut self, source: &impl AttributeSource) -> RepoResult<()> {
        self.sections = self.query.sections(source)?;
        debug!(
            "event=sections_derive module=query status=ok sections={} records={} key={} predicate={}",
            self.sections.len(),
            self.sections.iter().map(Section::len).sum::<usize>(),
            self.query.section_key.label(),
            self.query.predicate.as_ref().map_or("none", Predicate::label)
        );
        Ok(())
    }

    /// Replaces the sort. On error the previous sort is kept.
    pub fn set_sort(
        &mut self,
        sort: Vec<SortDescriptor>,
        source: &impl AttributeSource,
    ) -> RepoResult<()> {
        self.reconfigure(source, |query| query.sort = sort)
    }

    /// Replaces the section key. On error the previous key is kept.
    pub fn set_section_key(
        &mut self,
        section_key: SectionKey,
        source: &impl AttributeSource,
    ) -> RepoResult<()> {
        self.reconfigure(source, |query| query.section_key = section_key)
    }

    /// Replaces the predicate; `None` removes filtering. On error the previous
    /// predicate is kept.
    pub fn set_predicate(
        &mut self,
        predicate: Option<Predicate>,
        source: &impl AttributeSource,
    ) -> RepoResult<()> {
        self.reconfigure(source, |query| query.predicate = predicate)
    }

    // Configuration and snapshot change together or not at all.
    fn reconfigure(
        &mut self,
        source: &impl AttributeSource,
        change: impl FnOnce(&mut SectionedQuery),
    ) -> RepoResult<()> {
        let mut next = self.query.clone();
        change(&mut next);
        let sections = next.sections(source)?;

        self.query = next;
        self.sections = sections;
        self.warn_if_inconsistent();
        debug!(
            "event=sections_derive module=query status=ok sections={} key={} predicate={}",
            self.sections.len(),
            self.query.section_key.label(),
            self.query.predicate.as_ref().map_or("none", Predicate::label)
        );
        Ok(())
    }

    fn warn_if_inconsistent(&self) {
        if !self.query.is_key_consistent() {
            warn!(
                "event=section_key_mismatch module=query status=warn key={} primary_sort={}",
                self.query.section_key.label(),
                self.query
                    .sort
                    .first()
                    .map_or("none", |descriptor| descriptor.field.as_str())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_sections, AttributeSource, SectionedQuery, SectionedView};
    use crate::query::predicate::Predicate;
    use crate::repo::{RepoError, RepoResult};
    use crate::model::attribute::{Attribute, AttributeRecord};
    use crate::model::item::Item;
    use crate::query::section_key::SectionKey;
    use crate::query::sort::{SortDescriptor, SortField};

    fn records_for(item: &Item, orders: &[i64]) -> Vec<AttributeRecord> {
        orders
            .iter()
            .map(|order| AttributeRecord {
                attribute: Attribute::new(item, format!("{}.{order}", item.name), *order),
                item: item.clone(),
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_no_sections() {
        let sections = SectionedQuery::default().derive(Vec::new());
        assert!(sections.is_empty());
    }

    #[test]
    fn inconsistent_key_can_repeat_section_ids() {
        let a = Item::new("A", 0);
        let b = Item::new("B", 1);
        let mut records = records_for(&a, &[0, 1]);
        records.extend(records_for(&b, &[0, 1]));

        let sections = derive_sections(
            records,
            &SectionKey::item_name(),
            &[SortDescriptor::forward(SortField::AttributeOrder)],
            None,
        );
        let ids: Vec<&str> = sections.iter().map(|section| section.id.as_str()).collect();
        assert_eq!(ids, ["A", "B", "A", "B"]);
    }

    #[test]
    fn key_consistency_follows_primary_sort() {
        let by_item_order = SectionedQuery::new(
            SectionKey::item_order(),
            vec![
                SortDescriptor::forward(SortField::ItemOrder),
                SortDescriptor::forward(SortField::AttributeOrder),
            ],
        );
        assert!(by_item_order.is_key_consistent());

        let attribute_first = SectionedQuery::new(
            SectionKey::item_name(),
            vec![SortDescriptor::forward(SortField::AttributeOrder)],
        );
        assert!(!attribute_first.is_key_consistent());

        let custom = SectionedQuery::new(
            SectionKey::custom("constant", |_| "all".to_string()),
            vec![SortDescriptor::forward(SortField::ItemOrder)],
        );
        assert!(!custom.is_key_consistent());
    }

    #[test]
    fn name_key_under_order_sort_is_not_consistent_for_shared_orders() {
        let a = Item::new("A", 0);
        let b = Item::new("B", 0);
        let mut records = records_for(&a, &[0, 1]);
        records.extend(records_for(&b, &[0, 1]));

        let query = SectionedQuery::default();
        let ids: Vec<String> = query
            .derive(records)
            .into_iter()
            .map(|section| section.id)
            .collect();

        assert!(!query.is_key_consistent());
        assert_eq!(ids, ["A", "B", "A", "B"]);
    }

    struct FailingSource;

    impl AttributeSource for FailingSource {
        fn fetch_attribute_records(&self) -> RepoResult<Vec<AttributeRecord>> {
            Err(RepoError::InvalidData("store unavailable".to_string()))
        }
    }

    struct FixedSource(Vec<AttributeRecord>);

    impl AttributeSource for FixedSource {
        fn fetch_attribute_records(&self) -> RepoResult<Vec<AttributeRecord>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn failed_reconfiguration_keeps_previous_query_and_sections() {
        let item = Item::new("Z", 0);
        let source = FixedSource(records_for(&item, &[0, 1, 2]));
        let mut view = SectionedView::new(SectionedQuery::default(), &source).unwrap();
        let before = view.current_sections().to_vec();

        let err = view
            .set_predicate(Some(Predicate::first_attribute()), &FailingSource)
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
        assert!(view.query().predicate().is_none());

        let err = view
            .set_sort(
                vec![SortDescriptor::reverse(SortField::AttributeOrder)],
                &FailingSource,
            )
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
        assert_eq!(view.query().sort()[0].field, SortField::ItemOrder);

        assert!(view
            .set_section_key(SectionKey::attribute_name(), &FailingSource)
            .is_err());
        assert_eq!(view.query().section_key().label(), "item.name");
        assert_eq!(view.current_sections(), before.as_slice());
    }
}

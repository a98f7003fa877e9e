//! Sample use-case service driving a live sectioned view.
//!
//! # Responsibility
//! - Seed, reorder and clear items/attributes through `ModelContext`.
//! - Toggle the view's item sort direction and first-attribute filter.
//! - Re-derive sections after every mutation it performs.
//!
//! # Invariants
//! - `current_sections()` never lags behind a completed service call.
//! - Persistence failures are returned unchanged; nothing is retried.

use crate::model::attribute::Attribute;
use crate::model::item::Item;
use crate::query::{
    Predicate, Section, SectionKey, SectionedQuery, SectionedView, SortDescriptor, SortDirection,
    SortField,
};
use crate::repo::context::{ModelContext, SaveSummary};
use crate::repo::item_repo::ItemFetch;
use crate::repo::RepoResult;
use log::{info, warn};

/// Items seeded by `load()`, as `(name, order)`.
pub const SAMPLE_ITEMS: [(&str, i64); 3] = [("Z", 0), ("Y", 1), ("X", 2)];

/// Attributes seeded per item, ordered `0..ATTRIBUTES_PER_ITEM`.
pub const ATTRIBUTES_PER_ITEM: i64 = 3;

/// Owns the record store context and the sectioned view derived from it.
pub struct SampleService {
    context: ModelContext,
    view: SectionedView,
}

impl SampleService {
    /// Creates a service with the default item/attribute query.
    pub fn new(context: ModelContext) -> RepoResult<Self> {
        Self::with_query(context, SectionedQuery::default())
    }

    pub fn with_query(context: ModelContext, query: SectionedQuery) -> RepoResult<Self> {
        let view = SectionedView::new(query, &context)?;
        Ok(Self { context, view })
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    pub fn query(&self) -> &SectionedQuery {
        self.view.query()
    }

    pub fn current_sections(&self) -> &[Section] {
        self.view.current_sections()
    }

    /// Replaces all data with the sample items and their attributes.
    ///
    /// Returns the summary of the final save that inserted the sample data.
    pub fn load(&mut self) -> RepoResult<SaveSummary> {
        let result = self.load_inner();
        self.finish("load", result)
    }

    fn load_inner(&mut self) -> RepoResult<SaveSummary> {
        for item in self.context.fetch_items(&ItemFetch::default())? {
            self.context.delete_item(item.id)?;
        }
        self.context.save()?;

        // Cascade already removed these; kept for stores populated elsewhere.
        for record in self.context.fetch_attributes()? {
            self.context.delete_attribute(record.attribute.id)?;
        }
        self.context.save()?;

        for (name, order) in SAMPLE_ITEMS {
            let item = Item::new(name, order);
            self.context.insert_item(&item)?;
            for attribute_order in 0..ATTRIBUTES_PER_ITEM {
                let attribute = Attribute::new(
                    &item,
                    format!("{}.{attribute_order}", item.name),
                    attribute_order,
                );
                self.context.insert_attribute(&attribute)?;
            }
        }
        self.context.save()
    }

    /// Swaps the `order` of the first two items by current order.
    ///
    /// Returns `false` without writing when fewer than two items exist.
    pub fn swap(&mut self) -> RepoResult<bool> {
        let result = self.swap_inner();
        self.finish("swap", result)
    }

    fn swap_inner(&mut self) -> RepoResult<bool> {
        let mut items = self.context.fetch_items(&ItemFetch {
            limit: Some(2),
            ..ItemFetch::by_order()
        })?;
        let found = items.len();
        let [first, second] = items.as_mut_slice() else {
            warn!("event=items_swap module=service status=skipped found={found}");
            return Ok(false);
        };

        std::mem::swap(&mut first.order, &mut second.order);
        self.context.update_item(first)?;
        self.context.update_item(second)?;
        self.context.save()?;
        Ok(true)
    }

    /// Flips the item sort between forward and reverse.
    ///
    /// The secondary sort is reset to `attribute.order` forward. Returns the
    /// new item direction.
    pub fn toggle_item_sort(&mut self) -> RepoResult<SortDirection> {
        let current = self
            .view
            .query()
            .sort()
            .first()
            .map_or(SortDirection::Forward, |descriptor| descriptor.direction);
        let next = current.toggled();

        self.view.set_sort(
            vec![
                SortDescriptor::new(SortField::ItemOrder, next),
                SortDescriptor::forward(SortField::AttributeOrder),
            ],
            &self.context,
        )?;
        info!("event=item_sort_toggle module=service status=ok direction={next:?}");
        Ok(next)
    }

    /// Alternates between no filter and first-attribute-only.
    ///
    /// Returns whether the filter is active afterwards.
    pub fn toggle_attribute_filter(&mut self) -> RepoResult<bool> {
        let next = match self.view.query().predicate() {
            Some(_) => None,
            None => Some(Predicate::first_attribute()),
        };
        let active = next.is_some();

        self.view.set_predicate(next, &self.context)?;
        info!("event=attribute_filter_toggle module=service status=ok active={active}");
        Ok(active)
    }

    pub fn set_sort(&mut self, sort: Vec<SortDescriptor>) -> RepoResult<()> {
        self.view.set_sort(sort, &self.context)
    }

    pub fn set_predicate(&mut self, predicate: Option<Predicate>) -> RepoResult<()> {
        self.view.set_predicate(predicate, &self.context)
    }

    pub fn set_section_key(&mut self, section_key: SectionKey) -> RepoResult<()> {
        self.view.set_section_key(section_key, &self.context)
    }

    /// Runs arbitrary record store work, then re-derives sections.
    pub fn with_context<T>(
        &mut self,
        work: impl FnOnce(&mut ModelContext) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let result = work(&mut self.context);
        self.finish("context_work", result)
    }

    /// Re-derives sections from current store contents.
    pub fn refresh(&mut self) -> RepoResult<()> {
        self.view.refresh(&self.context)
    }

    // Refreshes even when `result` failed so partially applied writes are visible.
    fn finish<T>(&mut self, operation: &'static str, result: RepoResult<T>) -> RepoResult<T> {
        let refreshed = self.view.refresh(&self.context);
        match &result {
            Ok(_) => info!(
                "event={operation} module=service status=ok sections={}",
                self.view.current_sections().len()
            ),
            Err(err) => warn!("event={operation} module=service status=error error={err}"),
        }
        let value = result?;
        refreshed?;
        Ok(value)
    }
}

//! Sectioned query sample core.
//!
//! Items own attributes in a SQLite record store; a sectioned view groups
//! attributes by a derived key and keeps itself current as data and query
//! configuration change.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::attribute::{Attribute, AttributeId, AttributeRecord};
pub use model::item::{Item, ItemId};
pub use model::ValidationError;
pub use query::{
    derive_sections, AttributeSource, Predicate, Section, SectionKey, SectionedQuery,
    SectionedView, SortDescriptor, SortDirection, SortField,
};
pub use repo::attribute_repo::{AttributeRepository, SqliteAttributeRepository};
pub use repo::context::{ModelContext, SaveSummary};
pub use repo::item_repo::{ItemFetch, ItemOrdering, ItemRepository, SqliteItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::sample_service::{SampleService, ATTRIBUTES_PER_ITEM, SAMPLE_ITEMS};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

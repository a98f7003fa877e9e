//! Grouped query view over attribute records.
//!
//! # Responsibility
//! - Describe multi-field sorts, predicates and section keys.
//! - Derive ordered sections from a record snapshot as a pure function.
//! - Keep a live view whose configuration setters re-derive synchronously.
//!
//! # Invariants
//! - Derived sections partition exactly the records passing the predicate.
//! - Sections are consecutive runs of equal keys in sorted order; a key that
//!   disagrees with the primary sort field may therefore repeat.

pub mod predicate;
pub mod section_key;
pub mod sectioned;
pub mod sort;

pub use predicate::Predicate;
pub use section_key::SectionKey;
pub use sectioned::{derive_sections, AttributeSource, Section, SectionedQuery, SectionedView};
pub use sort::{SortDescriptor, SortDirection, SortField};

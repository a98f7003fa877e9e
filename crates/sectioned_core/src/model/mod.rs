//! Record types for the sectioned query sample.
//!
//! # Responsibility
//! - Define the parent `Item` and child `Attribute` records.
//! - Define the joined `AttributeRecord` read model used by grouped queries.
//!
//! # Invariants
//! - Every record is identified by a stable uuid.
//! - An `Attribute` always refers to exactly one live `Item`.

pub mod attribute;
pub mod item;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field-level validation failure raised before any write reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `name` is empty after trimming.
    BlankName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankName);
    }
    Ok(())
}

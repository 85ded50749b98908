//! Feature store abstraction.
//!
//! The intersection engine never indexes features itself. Every spatial
//! lookup goes through [`FeatureStore`], so callers can swap the in-memory
//! [`AnnotationStore`] for a database-backed store or a test double.

pub mod memory;

use indexmap::IndexMap;

use crate::types::Feature;

pub use memory::AnnotationStore;

/// Sequence length per sequence id, in the order the lengths were declared.
pub type ChromosomeLengthTable = IndexMap<String, i64>;

/// Random-access, type-filtered overlap queries over annotated features.
pub trait FeatureStore {
    /// All features of the given types overlapping `seq_id:start-end`.
    ///
    /// Results come back in the store's natural iteration order, which must
    /// be stable for identical inputs.
    fn query(&self, seq_id: &str, start: i64, end: i64, types: &[String]) -> Vec<Feature>;

    /// Known sequence lengths. May be empty.
    fn lengths(&self) -> &ChromosomeLengthTable;

    /// Features carrying the given name, in the order they were loaded.
    fn features_by_name(&self, name: &str) -> Vec<Feature>;
}

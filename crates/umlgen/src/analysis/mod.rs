//! Relation analysis and per-class resolution
//!
//! [`analyze`] derives the relation-field metadata of every class;
//! [`ProjectModel::build`] combines it with key selection, attribute
//! filtering and inheritance into the shapes the emitters render.

mod analyzer;
mod filter;
mod metadata;
mod shape;

pub use analyzer::{analyze, analyze_with_diagnostics, is_many};
pub use filter::{exclusion_reason, filter_attributes, FilterReason, FilteredAttributes};
pub use metadata::{Cardinality, RelationField, RelationMetadata, RelationType};
pub use shape::{ClassShape, ForeignKey, PrimaryKey, ProjectModel, ResourceMode, ScalarField};

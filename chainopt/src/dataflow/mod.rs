//! Inter-step data-flow compatibility
//!
//! Schemas are explicit `field -> TypeTag` maps built once at the boundary
//! from a JSON sample. Comparison is advisory: it annotates chain steps with
//! `requires_transformation` but never blocks chain generation.

pub mod compatibility;
pub mod schema;

pub use compatibility::{
    check_data_flow_compatibility, compare_schemas, SchemaCompatibilityResult,
    SuggestedTransformation, TypeConflict,
};
pub use schema::{Schema, TypeTag};

//! Chain construction, constraint filtering and alternative generation

pub mod alternatives;
pub mod builder;
pub mod constraints;
pub mod types;

pub use alternatives::{generate_alternatives, OptimizationProfile};
pub use builder::{ChainBuildOutput, ChainBuilder};
pub use constraints::{apply_constraints, ConstraintOutcome};
pub use types::{ChainStep, ToolChain};

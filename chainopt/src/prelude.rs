//! Common imports for embedding the optimizer

pub use crate::analysis::{
    analyze_workflow_goal, Capability, CapabilityRole, ComplexityLevel, WarningKind,
    WorkflowAnalysis, WorkflowType, WorkflowWarning,
};
pub use crate::chain::{ChainStep, ToolChain};
pub use crate::comparison::{ChainComparison, ComparisonCell, DimensionRow, TradeOff};
pub use crate::config::OptimizerConfig;
pub use crate::dataflow::{check_data_flow_compatibility, Schema, SchemaCompatibilityResult, TypeTag};
pub use crate::discovery::{CatalogDiscovery, DiscoveredTool, ScoredTool, ToolDiscovery};
pub use crate::error::{CriteriaError, DiscoveryError, OptimizationError, PatternStoreError};
pub use crate::optimizer::{ChainOptimizationRequest, ChainOptimizationResult, ChainOptimizer};
pub use crate::patterns::{InMemoryPatternStore, JsonlPatternStore, PatternStore};
pub use crate::scoring::{ChainOptimizationCriteria, Dimension};

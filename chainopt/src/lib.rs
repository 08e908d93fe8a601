// chainopt Library
// Tool chain optimization engine - picks and explains sequences of external tool calls for a goal

// Goal analysis and tool discovery
pub mod analysis;
pub mod discovery;

// Chain construction and ranking
pub mod chain;
pub mod comparison;
pub mod scoring;

// Inter-step checks and outcome telemetry
pub mod dataflow;
pub mod patterns;

// Engine entry point
pub mod optimizer;

// Infrastructure
pub mod config;
pub mod error;
pub mod prelude;
pub mod utils;

// Re-export the main engine
pub use crate::analysis::{analyze_workflow_goal, WorkflowAnalysis};
pub use crate::dataflow::{check_data_flow_compatibility, SchemaCompatibilityResult};
pub use crate::optimizer::{ChainOptimizationRequest, ChainOptimizationResult, ChainOptimizer};

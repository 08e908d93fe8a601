//! Error types for the optimizer
//!
//! Most failure modes in the engine are recovered locally and surface as
//! warnings on the result. The enums here cover the boundaries where a caller
//! actually needs to branch: criteria validation, discovery adapters, the
//! pattern store and configuration loading.

use thiserror::Error;

/// Rejected optimization weights
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriteriaError {
    #[error("Weight for '{dimension}' must be non-negative, got {value}")]
    NegativeWeight { dimension: &'static str, value: f64 },

    #[error("Weight for '{dimension}' is not a finite number")]
    NonFiniteWeight { dimension: &'static str },
}

/// Failure of a single discovery call
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    #[error("Discovery for '{capability}' timed out after {timeout_ms}ms")]
    Timeout { capability: String, timeout_ms: u64 },

    #[error("Discovery source unavailable: {0}")]
    Unavailable(String),

    #[error("Discovery returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure of a pattern store write
#[derive(Debug, Error)]
pub enum PatternStoreError {
    #[error("Pattern store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pattern store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Hard failures of `ChainOptimizer::optimize_chain`
#[derive(Debug, Error)]
pub enum OptimizationError {
    #[error("No capabilities could be extracted from goal: {goal:?}")]
    NoCapabilities { goal: String },

    #[error("Invalid optimization criteria: {0}")]
    InvalidCriteria(#[from] CriteriaError),
}

pub type OptimizerResult<T> = Result<T, OptimizationError>;

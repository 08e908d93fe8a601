//! Configuration for the optimizer
//!
//! Tunable constants (timeouts, pool sizes, complexity thresholds, alternative
//! counts) live here so they can be loaded from TOML or overridden through
//! `CHAINOPT_*` environment variables.

pub mod types;

pub use types::*;

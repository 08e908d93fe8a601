use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::analysis::ComplexityLevel;
use crate::error::ConfigError;

const ENV_PREFIX: &str = "CHAINOPT_";

/// Engine-wide tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Per-capability discovery timeout
    pub discovery_timeout_ms: u64,
    /// Maximum number of capability signatures kept in the discovery cache
    pub cache_max_entries: usize,
    /// Top-K tools kept per capability when enumerating chains
    pub candidate_pool_size: usize,
    /// Upper bound on enumerated tool combinations
    pub max_candidate_chains: usize,
    /// Relevance points added to tools listed in `preferred_tools`
    pub preferred_tool_boost: f64,
    /// Score window in which a chain with more preferred tools wins
    pub preference_tolerance: f64,
    /// Candidates with a lower relevance score are discarded
    pub min_relevance: f64,
    /// Drop tools that are not approved
    pub require_approved_tools: bool,
    /// Time added to a step whose input needs a data transformation
    pub transformation_overhead_ms: u64,
    /// Step time when neither the tool nor its category gives a hint
    pub default_step_latency_ms: u64,
    /// Per-category latency defaults
    pub category_latency_ms: BTreeMap<String, u64>,
    /// Complexity score at or below which a goal is `Simple`
    pub simple_complexity_max: f64,
    /// Complexity score at or below which a goal is `Moderate`
    pub moderate_complexity_max: f64,
    pub alternatives_simple: usize,
    pub alternatives_moderate: usize,
    pub alternatives_complex: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let category_latency_ms = [
            ("communication", 1200),
            ("data", 2000),
            ("storage", 1500),
            ("ai", 4000),
            ("finance", 2500),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            discovery_timeout_ms: 5000,
            cache_max_entries: 256,
            candidate_pool_size: 3,
            max_candidate_chains: 64,
            preferred_tool_boost: 25.0,
            preference_tolerance: 0.05,
            min_relevance: 0.0,
            require_approved_tools: false,
            transformation_overhead_ms: 250,
            default_step_latency_ms: 1500,
            category_latency_ms,
            simple_complexity_max: 3.0,
            moderate_complexity_max: 6.0,
            alternatives_simple: 1,
            alternatives_moderate: 2,
            alternatives_complex: 3,
        }
    }
}

impl OptimizerConfig {
    /// Load a configuration from a TOML file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: OptimizerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults overlaid with `CHAINOPT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `CHAINOPT_*` environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(v) = env_parse("DISCOVERY_TIMEOUT_MS")? {
            self.discovery_timeout_ms = v;
        }
        if let Some(v) = env_parse("CACHE_MAX_ENTRIES")? {
            self.cache_max_entries = v;
        }
        if let Some(v) = env_parse("CANDIDATE_POOL_SIZE")? {
            self.candidate_pool_size = v;
        }
        if let Some(v) = env_parse("MAX_CANDIDATE_CHAINS")? {
            self.max_candidate_chains = v;
        }
        if let Some(v) = env_parse("PREFERRED_TOOL_BOOST")? {
            self.preferred_tool_boost = v;
        }
        if let Some(v) = env_parse::<String>("REQUIRE_APPROVED_TOOLS")? {
            self.require_approved_tools = match v.to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => true,
                "0" | "false" | "off" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: format!("{}REQUIRE_APPROVED_TOOLS", ENV_PREFIX),
                        value: v,
                    })
                }
            };
        }
        Ok(self)
    }

    /// Latency estimate for a tool category
    pub fn latency_for_category(&self, category: &str) -> u64 {
        self.category_latency_ms
            .get(&category.to_lowercase())
            .copied()
            .unwrap_or(self.default_step_latency_ms)
    }

    pub fn complexity_level(&self, score: f64) -> ComplexityLevel {
        if score <= self.simple_complexity_max {
            ComplexityLevel::Simple
        } else if score <= self.moderate_complexity_max {
            ComplexityLevel::Moderate
        } else {
            ComplexityLevel::Complex
        }
    }

    /// How many alternatives a goal of the given complexity may receive
    pub fn alternatives_for(&self, level: ComplexityLevel) -> usize {
        match level {
            ComplexityLevel::Simple => self.alternatives_simple,
            ComplexityLevel::Moderate => self.alternatives_moderate,
            ComplexityLevel::Complex => self.alternatives_complex,
        }
        .min(3)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    let full_key = format!("{}{}", ENV_PREFIX, key);
    match std::env::var(&full_key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: full_key,
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

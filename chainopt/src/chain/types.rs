use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::analysis::Capability;
use crate::dataflow::SchemaCompatibilityResult;
use crate::discovery::DiscoveredTool;
use crate::utils::fingerprint;

/// One tool invocation fulfilling exactly one capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainStep {
    /// 1-based position in the chain
    pub order: usize,
    pub tool: DiscoveredTool,
    pub capability: Capability,
    /// Discovery relevance of the tool for this capability, 0-100
    pub relevance_score: f64,
    pub estimated_time_ms: u64,
    pub estimated_cost_usd: f64,
    pub requires_transformation: bool,
    /// Compatibility of the previous step's output with this step's input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_flow: Option<SchemaCompatibilityResult>,
}

/// An ordered sequence of tool invocations.
///
/// Built fresh per optimization call; totals are always derived from the
/// steps so they cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolChain {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<ChainStep>,
    pub total_estimated_time_ms: u64,
    pub total_estimated_cost_usd: f64,
    /// Probability every step succeeds (product of step reliabilities)
    pub reliability_score: f64,
    /// Weighted score; only comparable with chains of the same request
    pub optimization_score: f64,
    pub can_parallelize: bool,
    #[serde(default)]
    pub metadata: BTreeMap<String, JsonValue>,
}

impl ToolChain {
    /// Assemble a chain, renumbering steps and deriving every aggregate field
    pub fn from_steps(mut steps: Vec<ChainStep>) -> Self {
        for (i, step) in steps.iter_mut().enumerate() {
            step.order = i + 1;
        }

        let composition: Vec<String> = steps
            .iter()
            .map(|s| format!("{}={}", s.capability.name, s.tool.id))
            .collect();
        let id = format!("chain-{}", fingerprint(composition.iter().map(String::as_str)));

        let name = if steps.is_empty() {
            "Empty chain".to_string()
        } else {
            steps
                .iter()
                .map(|s| s.tool.name.as_str())
                .collect::<Vec<_>>()
                .join(" → ")
        };

        let can_parallelize = steps.len() > 1
            && steps
                .iter()
                .all(|s| s.capability.role == steps[0].capability.role);

        let joiner = if can_parallelize { ", alongside " } else { ", then " };
        let description = steps
            .iter()
            .map(|s| format!("{} via {}", s.capability.name, s.tool.name))
            .collect::<Vec<_>>()
            .join(joiner);

        let total_estimated_time_ms = steps.iter().map(|s| s.estimated_time_ms).sum();
        let total_estimated_cost_usd = steps.iter().map(|s| s.estimated_cost_usd).sum();
        let reliability_score = steps
            .iter()
            .map(|s| s.tool.reliability_rating.clamp(0.0, 1.0))
            .product();

        Self {
            id,
            name,
            description,
            steps,
            total_estimated_time_ms,
            total_estimated_cost_usd,
            reliability_score,
            optimization_score: 0.0,
            can_parallelize,
            metadata: BTreeMap::new(),
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn transformation_count(&self) -> usize {
        self.steps.iter().filter(|s| s.requires_transformation).count()
    }

    pub fn tool_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.tool.id.as_str()).collect()
    }

    pub fn uses_tool(&self, tool_id: &str) -> bool {
        self.steps.iter().any(|s| s.tool.id == tool_id)
    }

    /// Same capability → tool assignment, ignoring scores and metadata
    pub fn same_composition(&self, other: &ToolChain) -> bool {
        self.steps.len() == other.steps.len()
            && self
                .steps
                .iter()
                .zip(&other.steps)
                .all(|(a, b)| a.capability.name == b.capability.name && a.tool.id == b.tool.id)
    }

    /// Number of steps whose tool the caller listed as preferred
    pub fn preferred_tool_count(&self, preferred: &[String]) -> usize {
        self.steps
            .iter()
            .filter(|s| preferred.iter().any(|p| *p == s.tool.id))
            .count()
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

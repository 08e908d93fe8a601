use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chain::ToolChain;

/// A chain that ran to completion, with estimated and observed figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessfulPattern {
    pub pattern_id: Uuid,
    pub chain_id: String,
    pub tool_ids: Vec<String>,
    pub capabilities: Vec<String>,
    pub estimated_time_ms: u64,
    pub actual_time_ms: u64,
    pub estimated_cost_usd: f64,
    pub actual_cost_usd: f64,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl SuccessfulPattern {
    pub fn from_chain(
        chain: &ToolChain,
        actual_time_ms: u64,
        actual_cost_usd: f64,
        user_id: impl Into<String>,
        project_id: Option<String>,
    ) -> Self {
        Self {
            pattern_id: Uuid::new_v4(),
            chain_id: chain.id.clone(),
            tool_ids: chain.tool_ids().into_iter().map(String::from).collect(),
            capabilities: capability_names(chain),
            estimated_time_ms: chain.total_estimated_time_ms,
            actual_time_ms,
            estimated_cost_usd: chain.total_estimated_cost_usd,
            actual_cost_usd,
            user_id: user_id.into(),
            project_id,
            recorded_at: Utc::now(),
        }
    }

    /// Observed over estimated time; above 1.0 means the chain ran slow
    pub fn time_ratio(&self) -> Option<f64> {
        (self.estimated_time_ms > 0).then(|| self.actual_time_ms as f64 / self.estimated_time_ms as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainFailure {
    pub pattern_id: Uuid,
    pub chain_id: String,
    pub tool_ids: Vec<String>,
    pub capabilities: Vec<String>,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
}

impl ChainFailure {
    pub fn from_chain(chain: &ToolChain, user_id: impl Into<String>) -> Self {
        Self {
            pattern_id: Uuid::new_v4(),
            chain_id: chain.id.clone(),
            tool_ids: chain.tool_ids().into_iter().map(String::from).collect(),
            capabilities: capability_names(chain),
            user_id: user_id.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// One persisted line of a pattern log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternRecord {
    Success(SuccessfulPattern),
    Failure(ChainFailure),
}

impl PatternRecord {
    pub fn chain_id(&self) -> &str {
        match self {
            PatternRecord::Success(p) => &p.chain_id,
            PatternRecord::Failure(f) => &f.chain_id,
        }
    }
}

fn capability_names(chain: &ToolChain) -> Vec<String> {
    chain.steps.iter().map(|s| s.capability.name.clone()).collect()
}

use serde::{Deserialize, Serialize};

use crate::analysis::{WorkflowAnalysis, WorkflowWarning};
use crate::chain::ToolChain;
use crate::comparison::ChainComparison;
use crate::scoring::ChainOptimizationCriteria;

/// What the caller wants a chain for, and under which limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOptimizationRequest {
    #[serde(alias = "workflowGoal")]
    pub workflow_goal: String,
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(default, alias = "preferredTools")]
    pub preferred_tools: Vec<String>,
    #[serde(default, alias = "excludedTools")]
    pub excluded_tools: Vec<String>,
    #[serde(default)]
    pub criteria: Option<ChainOptimizationCriteria>,
    #[serde(default, alias = "budgetLimitUsd")]
    pub budget_limit_usd: Option<f64>,
    #[serde(default, alias = "timeLimitMs")]
    pub time_limit_ms: Option<u64>,
    #[serde(default, alias = "maxSteps")]
    pub max_steps: Option<usize>,
}

impl ChainOptimizationRequest {
    pub fn new(workflow_goal: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            workflow_goal: workflow_goal.into(),
            user_id: user_id.into(),
            preferred_tools: Vec::new(),
            excluded_tools: Vec::new(),
            criteria: None,
            budget_limit_usd: None,
            time_limit_ms: None,
            max_steps: None,
        }
    }

    pub fn with_preferred_tools(mut self, tools: Vec<String>) -> Self {
        self.preferred_tools = tools;
        self
    }

    pub fn with_excluded_tools(mut self, tools: Vec<String>) -> Self {
        self.excluded_tools = tools;
        self
    }

    pub fn with_criteria(mut self, criteria: ChainOptimizationCriteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn with_budget(mut self, usd: f64) -> Self {
        self.budget_limit_usd = Some(usd);
        self
    }

    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }
}

/// Outcome of one optimization call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainOptimizationResult {
    /// None only when every capability was unfillable
    pub recommended_chain: Option<ToolChain>,
    pub alternatives: Vec<ToolChain>,
    pub workflow_analysis: WorkflowAnalysis,
    pub comparison: ChainComparison,
    /// Normalized weights actually used
    pub criteria: ChainOptimizationCriteria,
    pub generation_time_ms: u64,
    pub warnings: Vec<WorkflowWarning>,
    pub dropped_capabilities: Vec<String>,
}

impl ChainOptimizationResult {
    /// Recommended chain followed by the alternatives
    pub fn all_chains(&self) -> impl Iterator<Item = &ToolChain> {
        self.recommended_chain.iter().chain(self.alternatives.iter())
    }
}

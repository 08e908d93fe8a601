//! The optimization engine
//!
//! `ChainOptimizer` is constructed by the caller with its discovery adapter
//! and, optionally, a pattern store. Its only state across calls is the
//! bounded discovery cache.
//!
//! Pipeline per `optimize_chain` call:
//! analysis → discovery fan-out → chain building → constraint filter →
//! scoring and selection → alternatives → comparison.

pub mod types;

pub use types::{ChainOptimizationRequest, ChainOptimizationResult};

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::analysis::{
    analyze_workflow_goal_with_config, WarningKind, WorkflowAnalysis, WorkflowWarning,
};
use crate::chain::{apply_constraints, generate_alternatives, ChainBuilder, ToolChain};
use crate::comparison::{build_comparison, ChainComparison};
use crate::config::OptimizerConfig;
use crate::dataflow::SchemaCompatibilityResult;
use crate::discovery::{discover_all, DiscoveryCache, ToolDiscovery};
use crate::error::{OptimizationError, OptimizerResult};
use crate::patterns::{PatternRecorder, PatternStore};
use crate::scoring::{compare_ranked, score_chains, select_best};

pub struct ChainOptimizer {
    discovery: Arc<dyn ToolDiscovery>,
    recorder: PatternRecorder,
    cache: DiscoveryCache,
    config: OptimizerConfig,
}

impl ChainOptimizer {
    pub fn new(discovery: Arc<dyn ToolDiscovery>) -> Self {
        Self::with_config(discovery, OptimizerConfig::default())
    }

    pub fn with_config(discovery: Arc<dyn ToolDiscovery>, config: OptimizerConfig) -> Self {
        Self {
            discovery,
            recorder: PatternRecorder::default(),
            cache: DiscoveryCache::new(config.cache_max_entries),
            config,
        }
    }

    pub fn with_pattern_store(mut self, store: Arc<dyn PatternStore>) -> Self {
        self.recorder = PatternRecorder::new(Some(store));
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn analyze_workflow_goal(&self, goal: &str) -> WorkflowAnalysis {
        analyze_workflow_goal_with_config(goal, &self.config)
    }

    pub fn check_data_flow_compatibility(
        &self,
        source: &serde_json::Value,
        target: &serde_json::Value,
    ) -> SchemaCompatibilityResult {
        crate::dataflow::check_data_flow_compatibility(source, target)
    }

    /// Find, rank and explain the best chain for a goal.
    ///
    /// Fails only for invalid criteria or a goal with no recognizable
    /// capability. Unfillable capabilities, discovery errors and infeasible
    /// limits come back as warnings on a successful result.
    pub async fn optimize_chain(
        &self,
        request: &ChainOptimizationRequest,
    ) -> OptimizerResult<ChainOptimizationResult> {
        let started = Instant::now();

        let supplied = request.criteria.unwrap_or_default();
        let criteria = supplied.normalized()?;
        let mut warnings = Vec::new();
        if criteria != supplied {
            warnings.push(WorkflowWarning::new(
                WarningKind::CriteriaAdjusted,
                format!("Criteria weights were normalized to {}", criteria.describe()),
            ));
        }

        let analysis = self.analyze_workflow_goal(&request.workflow_goal);
        if analysis.extracted_capabilities.is_empty() {
            return Err(OptimizationError::NoCapabilities {
                goal: request.workflow_goal.clone(),
            });
        }
        warnings.extend(analysis.warnings.iter().cloned());

        let discovery = discover_all(
            self.discovery.as_ref(),
            &self.cache,
            &analysis.extracted_capabilities,
            Duration::from_millis(self.config.discovery_timeout_ms),
        )
        .await;
        warnings.extend(discovery.warnings);

        let built = ChainBuilder::new(&self.config).build_candidate_chains(
            &analysis,
            &discovery.candidates,
            request,
        );
        warnings.extend(built.warnings);
        let candidate_count = built.chains.len();

        let constrained = apply_constraints(
            built.chains,
            request.budget_limit_usd,
            request.time_limit_ms,
            &request.excluded_tools,
        );
        warnings.extend(constrained.warnings);

        let mut chains = constrained.chains;
        score_chains(&mut chains, &criteria);

        let (recommended_chain, alternatives, comparison) =
            match select_best(&chains, &request.preferred_tools, self.config.preference_tolerance) {
                Some(index) => {
                    let recommended = chains[index].clone();
                    let alternatives = if built.has_choice && !constrained.relaxed {
                        let count = self.config.alternatives_for(analysis.complexity_level);
                        let mut alternatives = generate_alternatives(&chains, &recommended, count);
                        alternatives.sort_by(compare_ranked);
                        alternatives
                    } else {
                        Vec::new()
                    };
                    let comparison = build_comparison(&recommended, &alternatives, &criteria);
                    (Some(recommended), alternatives, comparison)
                }
                None => (None, Vec::new(), ChainComparison::default()),
            };

        let generation_time_ms = started.elapsed().as_millis() as u64;
        info!(
            "optimized goal with {} capabilities: {} candidates, {} alternatives, recommended={}, {}ms",
            analysis.extracted_capabilities.len(),
            candidate_count,
            alternatives.len(),
            recommended_chain.as_ref().map(|c| c.id.as_str()).unwrap_or("none"),
            generation_time_ms
        );
        debug!("{} cache hits during discovery", discovery.cache_hits);

        Ok(ChainOptimizationResult {
            recommended_chain,
            alternatives,
            workflow_analysis: analysis,
            comparison,
            criteria,
            generation_time_ms,
            warnings,
            dropped_capabilities: built.dropped_capabilities,
        })
    }

    pub async fn store_successful_pattern(
        &self,
        chain: &ToolChain,
        actual_time_ms: u64,
        actual_cost_usd: f64,
        user_id: &str,
        project_id: Option<&str>,
    ) {
        self.recorder
            .store_successful_pattern(chain, actual_time_ms, actual_cost_usd, user_id, project_id)
            .await;
    }

    pub async fn record_chain_failure(&self, chain: &ToolChain, user_id: &str) {
        self.recorder.record_chain_failure(chain, user_id).await;
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

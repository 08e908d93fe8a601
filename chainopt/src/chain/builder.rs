//! Candidate chain construction
//!
//! Each capability gets a ranked pool of tools; candidate chains are
//! combinations of those pools. Combinations are listed best-first so the
//! `max_candidate_chains` cut drops the least promising ones:
//!
//! 1. the greedy chain (top-ranked tool everywhere),
//! 2. the cheapest, fastest and most reliable tool for every capability,
//! 3. the rest in order of total rank, via a min-heap over rank vectors.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use indexmap::IndexMap;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde_json::json;
use tracing::{debug, warn};

use super::types::{ChainStep, ToolChain};
use crate::analysis::{Capability, WarningKind, WorkflowAnalysis, WorkflowWarning};
use crate::config::OptimizerConfig;
use crate::dataflow::compare_schemas;
use crate::discovery::ScoredTool;
use crate::optimizer::ChainOptimizationRequest;

/// Everything the builder produced for one request
#[derive(Debug, Clone, Default)]
pub struct ChainBuildOutput {
    pub chains: Vec<ToolChain>,
    pub warnings: Vec<WorkflowWarning>,
    /// Capabilities whose pool was emptied by exclusion or filtering
    pub unfillable: Vec<String>,
    /// Fillable capabilities cut by `max_steps`
    pub dropped_capabilities: Vec<String>,
    /// At least one capability had two or more viable tools
    pub has_choice: bool,
}

struct Pool<'a> {
    capability: &'a Capability,
    tools: Vec<&'a ScoredTool>,
}

impl Pool<'_> {
    fn best_relevance(&self) -> f64 {
        self.tools
            .iter()
            .map(|t| OrderedFloat(t.relevance_score))
            .max()
            .map(|v| v.into_inner())
            .unwrap_or(0.0)
    }
}

pub struct ChainBuilder<'a> {
    config: &'a OptimizerConfig,
}

impl<'a> ChainBuilder<'a> {
    pub fn new(config: &'a OptimizerConfig) -> Self {
        Self { config }
    }

    /// Build candidate chains from discovered tools.
    ///
    /// `discovered` is keyed by capability name; capabilities missing from it
    /// were already reported unfillable by discovery and are skipped here.
    pub fn build_candidate_chains(
        &self,
        analysis: &WorkflowAnalysis,
        discovered: &IndexMap<String, Vec<ScoredTool>>,
        request: &ChainOptimizationRequest,
    ) -> ChainBuildOutput {
        let mut output = ChainBuildOutput::default();

        let mut pools = Vec::new();
        for capability in &analysis.extracted_capabilities {
            let Some(candidates) = discovered.get(&capability.name) else {
                continue;
            };
            let tools = self.candidate_pool(candidates, request);
            if tools.is_empty() {
                warn!("all candidates for '{}' were excluded or filtered", capability.name);
                output.unfillable.push(capability.name.clone());
                output.warnings.push(WorkflowWarning::for_capability(
                    WarningKind::UnfillableCapability,
                    &capability.name,
                    format!(
                        "Every candidate tool for '{}' was excluded or filtered out",
                        capability.name
                    ),
                ));
                continue;
            }
            pools.push(Pool { capability, tools });
        }

        if pools.is_empty() {
            return output;
        }

        if let Some(requested) = request.max_steps {
            let limit = if requested == 0 {
                output.warnings.push(WorkflowWarning::new(
                    WarningKind::StepLimit,
                    "max_steps of 0 cannot produce a chain; using 1",
                ));
                1
            } else {
                requested
            };
            if pools.len() > limit {
                output.dropped_capabilities = self.apply_step_limit(&mut pools, limit);
                output.warnings.push(WorkflowWarning::new(
                    WarningKind::StepLimit,
                    format!(
                        "Step limit of {} dropped capabilities: {}",
                        limit,
                        output.dropped_capabilities.join(", ")
                    ),
                ));
            }
        }

        // Producers feed transformers, which feed consumers
        pools.sort_by_key(|p| p.capability.role);
        output.has_choice = pools.iter().any(|p| p.tools.len() > 1);

        output.chains = self
            .selections(&pools)
            .into_iter()
            .map(|selection| {
                let steps = pools
                    .iter()
                    .zip(selection)
                    .map(|(pool, index)| self.step_for(pool.capability, pool.tools[index]))
                    .collect();
                self.finish_chain(steps, analysis, request, &output.dropped_capabilities)
            })
            .collect();

        debug!(
            "built {} candidate chains over {} capabilities",
            output.chains.len(),
            pools.len()
        );
        output
    }

    fn candidate_pool<'t>(
        &self,
        candidates: &'t [ScoredTool],
        request: &ChainOptimizationRequest,
    ) -> Vec<&'t ScoredTool> {
        let is_preferred = |t: &ScoredTool| request.preferred_tools.iter().any(|p| *p == t.tool.id);
        let boosted = |t: &ScoredTool| {
            let boost = if is_preferred(t) {
                self.config.preferred_tool_boost
            } else {
                0.0
            };
            OrderedFloat(t.relevance_score + boost)
        };

        let mut ranked: Vec<&ScoredTool> = candidates
            .iter()
            .filter(|t| !request.excluded_tools.iter().any(|x| *x == t.tool.id))
            .filter(|t| t.relevance_score >= self.config.min_relevance)
            .filter(|t| t.tool.is_approved || !self.config.require_approved_tools)
            .unique_by(|t| t.tool.id.clone())
            .collect();
        ranked.sort_by(|a, b| boosted(b).cmp(&boosted(a)).then_with(|| a.tool.id.cmp(&b.tool.id)));

        let size = self.config.candidate_pool_size.max(1);
        let mut pool: Vec<&ScoredTool> = ranked.iter().take(size).copied().collect();
        pool.extend(ranked.iter().skip(size).filter(|t| is_preferred(t)).copied());
        pool
    }

    /// Keep the `limit` pools with the most relevant best candidate, in their
    /// original order. Returns the names of the dropped capabilities.
    fn apply_step_limit(&self, pools: &mut Vec<Pool<'_>>, limit: usize) -> Vec<String> {
        let keep: Vec<usize> = pools
            .iter()
            .enumerate()
            .sorted_by(|(ia, a), (ib, b)| {
                OrderedFloat(b.best_relevance())
                    .cmp(&OrderedFloat(a.best_relevance()))
                    .then_with(|| ia.cmp(ib))
            })
            .take(limit)
            .map(|(i, _)| i)
            .collect();

        let mut dropped = Vec::new();
        let mut index = 0;
        pools.retain(|pool| {
            let kept = keep.contains(&index);
            if !kept {
                dropped.push(pool.capability.name.clone());
            }
            index += 1;
            kept
        });
        warn!("step limit {} dropped capabilities {:?}", limit, dropped);
        dropped
    }

    /// Tool index per pool for every chain to build, best-first, capped at
    /// `max_candidate_chains`
    fn selections(&self, pools: &[Pool<'_>]) -> Vec<Vec<usize>> {
        let cap = self.config.max_candidate_chains.max(1);
        let mut selected: Vec<Vec<usize>> = Vec::new();
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut push = |selection: Vec<usize>, selected: &mut Vec<Vec<usize>>| {
            if selected.len() < cap && seen.insert(selection.clone()) {
                selected.push(selection);
            }
        };

        let greedy = vec![0; pools.len()];
        push(greedy.clone(), &mut selected);

        // One chain per single-dimension profile, so each profile can reach
        // its best tools whatever the relevance ranking says
        let cheapest: Vec<usize> = pools
            .iter()
            .map(|p| {
                p.tools
                    .iter()
                    .position_min_by_key(|t| OrderedFloat(t.tool.cost_estimate_usd))
                    .unwrap_or(0)
            })
            .collect();
        let fastest: Vec<usize> = pools
            .iter()
            .map(|p| {
                p.tools
                    .iter()
                    .position_min_by_key(|t| self.estimated_time_ms(p.capability, t))
                    .unwrap_or(0)
            })
            .collect();
        let most_reliable: Vec<usize> = pools
            .iter()
            .map(|p| {
                p.tools
                    .iter()
                    .position_min_by_key(|t| Reverse(OrderedFloat(t.tool.reliability_rating)))
                    .unwrap_or(0)
            })
            .collect();
        for seed in [cheapest, fastest, most_reliable] {
            push(seed, &mut selected);
        }

        // Remaining combinations by ascending rank sum; ties by rank vector
        let mut heap = BinaryHeap::new();
        let mut queued: HashSet<Vec<usize>> = HashSet::new();
        queued.insert(greedy.clone());
        heap.push(Reverse((0usize, greedy)));
        while selected.len() < cap {
            let Some(Reverse((rank_sum, selection))) = heap.pop() else {
                break;
            };
            for (i, pool) in pools.iter().enumerate() {
                if selection[i] + 1 < pool.tools.len() {
                    let mut next = selection.clone();
                    next[i] += 1;
                    if queued.insert(next.clone()) {
                        heap.push(Reverse((rank_sum + 1, next)));
                    }
                }
            }
            push(selection, &mut selected);
        }

        selected
    }

    fn estimated_time_ms(&self, capability: &Capability, scored: &ScoredTool) -> u64 {
        let tool = &scored.tool;
        let category = if tool.category.is_empty() {
            capability.category.as_str()
        } else {
            tool.category.as_str()
        };
        tool.avg_latency_ms
            .unwrap_or_else(|| self.config.latency_for_category(category))
    }

    fn step_for(&self, capability: &Capability, scored: &ScoredTool) -> ChainStep {
        let tool = &scored.tool;
        ChainStep {
            order: 0,
            tool: tool.clone(),
            capability: capability.clone(),
            relevance_score: scored.relevance_score,
            estimated_time_ms: self.estimated_time_ms(capability, scored),
            estimated_cost_usd: tool.cost_estimate_usd.max(0.0),
            requires_transformation: false,
            data_flow: None,
        }
    }

    fn finish_chain(
        &self,
        mut steps: Vec<ChainStep>,
        analysis: &WorkflowAnalysis,
        request: &ChainOptimizationRequest,
        dropped: &[String],
    ) -> ToolChain {
        for i in 1..steps.len() {
            let (before, after) = steps.split_at_mut(i);
            let previous = &before[i - 1];
            let step = &mut after[0];
            if let (Some(output), Some(input)) =
                (&previous.tool.output_schema, &step.tool.input_schema)
            {
                let result = compare_schemas(output, input);
                if result.transformation_required {
                    step.requires_transformation = true;
                    step.estimated_time_ms += self.config.transformation_overhead_ms;
                }
                step.data_flow = Some(result);
            }
        }

        let chain = ToolChain::from_steps(steps);
        let average_trust = chain.steps.iter().map(|s| s.tool.trust_score).sum::<f64>()
            / chain.step_count().max(1) as f64;
        let preferred_count = chain.preferred_tool_count(&request.preferred_tools);
        let parallel_time = chain.steps.iter().map(|s| s.estimated_time_ms).max();
        let can_parallelize = chain.can_parallelize;

        let mut chain = chain
            .with_metadata("workflow_type", analysis.workflow_type.as_str())
            .with_metadata("average_trust_score", average_trust)
            .with_metadata("preferred_tool_count", preferred_count)
            .with_metadata("dropped_capabilities", json!(dropped));
        if can_parallelize {
            if let Some(ms) = parallel_time {
                chain = chain.with_metadata("parallel_time_ms", ms);
            }
        }
        chain
    }
}

//! Budget and time-limit filtering with relaxation

use ordered_float::OrderedFloat;
use tracing::warn;

use super::types::ToolChain;
use crate::analysis::{WarningKind, WorkflowWarning};

#[derive(Debug, Clone, Default)]
pub struct ConstraintOutcome {
    pub chains: Vec<ToolChain>,
    /// Nothing satisfied the limits; `chains` holds the least-violating one
    pub relaxed: bool,
    pub warnings: Vec<WorkflowWarning>,
}

/// Drop chains over budget or over the time limit.
///
/// Never empties a non-empty set: when nothing fits, the chain with the
/// smallest relative overage is kept and a `ConstraintRelaxed` warning added.
/// Chains using an excluded tool are removed outright.
pub fn apply_constraints(
    chains: Vec<ToolChain>,
    budget_limit_usd: Option<f64>,
    time_limit_ms: Option<u64>,
    excluded_tools: &[String],
) -> ConstraintOutcome {
    let mut outcome = ConstraintOutcome::default();

    let (valid, leaked): (Vec<ToolChain>, Vec<ToolChain>) = chains
        .into_iter()
        .partition(|c| !excluded_tools.iter().any(|x| c.uses_tool(x)));
    if !leaked.is_empty() {
        warn!("discarded {} chains containing excluded tools", leaked.len());
    }
    if valid.is_empty() {
        return outcome;
    }

    let (fits, over): (Vec<ToolChain>, Vec<ToolChain>) = valid
        .into_iter()
        .partition(|c| violation(c, budget_limit_usd, time_limit_ms) == 0.0);

    if !fits.is_empty() {
        outcome.chains = fits;
        return outcome;
    }

    let Some(closest) = over.into_iter().min_by(|a, b| {
        OrderedFloat(violation(a, budget_limit_usd, time_limit_ms))
            .cmp(&OrderedFloat(violation(b, budget_limit_usd, time_limit_ms)))
            .then_with(|| OrderedFloat(a.total_estimated_cost_usd).cmp(&OrderedFloat(b.total_estimated_cost_usd)))
            .then_with(|| a.id.cmp(&b.id))
    }) else {
        return outcome;
    };

    let mut reasons = Vec::new();
    if let Some(budget) = budget_limit_usd {
        if closest.total_estimated_cost_usd > budget {
            reasons.push(format!(
                "cost ${:.4} exceeds budget ${:.4}",
                closest.total_estimated_cost_usd, budget
            ));
        }
    }
    if let Some(limit) = time_limit_ms {
        if closest.total_estimated_time_ms > limit {
            reasons.push(format!(
                "time {}ms exceeds limit {}ms",
                closest.total_estimated_time_ms, limit
            ));
        }
    }
    let message = format!(
        "No chain satisfies the constraints; returning the closest one ({})",
        reasons.join("; ")
    );
    warn!("{}", message);

    outcome.relaxed = true;
    outcome.warnings.push(WorkflowWarning::new(WarningKind::ConstraintRelaxed, message));
    outcome.chains = vec![closest];
    outcome
}

/// Sum of relative overages; 0.0 when the chain fits
fn violation(chain: &ToolChain, budget_limit_usd: Option<f64>, time_limit_ms: Option<u64>) -> f64 {
    let mut total = 0.0;
    if let Some(budget) = budget_limit_usd {
        total += overage(chain.total_estimated_cost_usd, budget);
    }
    if let Some(limit) = time_limit_ms {
        total += overage(chain.total_estimated_time_ms as f64, limit as f64);
    }
    total
}

fn overage(value: f64, limit: f64) -> f64 {
    if value <= limit {
        0.0
    } else if limit > 0.0 {
        (value - limit) / limit
    } else {
        value - limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Capability, CapabilityRole};
    use crate::chain::ChainStep;
    use crate::discovery::DiscoveredTool;

    fn chain(tool: &str, cost: f64, time: u64) -> ToolChain {
        ToolChain::from_steps(vec![ChainStep {
            order: 1,
            tool: DiscoveredTool::new(tool, tool, "communication").with_cost(cost),
            capability: Capability::new("send_email", "communication", CapabilityRole::Consumer),
            relevance_score: 90.0,
            estimated_time_ms: time,
            estimated_cost_usd: cost,
            requires_transformation: false,
            data_flow: None,
        }])
    }

    #[test]
    fn test_chains_over_budget_are_dropped() {
        let outcome = apply_constraints(
            vec![chain("cheap", 0.01, 1000), chain("pricey", 1.0, 1000)],
            Some(0.5),
            None,
            &[],
        );
        assert!(!outcome.relaxed);
        assert_eq!(outcome.chains.len(), 1);
        assert_eq!(outcome.chains[0].tool_ids(), vec!["cheap"]);
    }

    #[test]
    fn test_infeasible_budget_relaxes_to_closest_chain() {
        let outcome = apply_constraints(
            vec![chain("pricey", 1.0, 1000), chain("pricier", 3.0, 1000)],
            Some(0.01),
            None,
            &[],
        );
        assert!(outcome.relaxed);
        assert_eq!(outcome.chains.len(), 1);
        assert_eq!(outcome.chains[0].tool_ids(), vec!["pricey"]);
        assert_eq!(outcome.warnings[0].kind, WarningKind::ConstraintRelaxed);
    }

    #[test]
    fn test_time_limit_uses_relative_overage() {
        let outcome = apply_constraints(
            vec![chain("slow", 0.0, 3000), chain("slower", 0.0, 5000)],
            None,
            Some(1000),
            &[],
        );
        assert_eq!(outcome.chains[0].tool_ids(), vec!["slow"]);
    }

    #[test]
    fn test_excluded_tools_are_revalidated() {
        let outcome = apply_constraints(
            vec![chain("gmail", 0.0, 1000), chain("outlook", 0.0, 1000)],
            None,
            None,
            &["gmail".to_string()],
        );
        assert_eq!(outcome.chains.len(), 1);
        assert!(!outcome.chains[0].uses_tool("gmail"));
    }
}

//! Single-dimension alternatives to the recommended chain

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::types::ToolChain;
use crate::scoring::{compare_ranked, score_chain, score_key, ChainOptimizationCriteria};

/// A weight profile that keeps one dimension and zeroes the others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationProfile {
    Cost,
    Speed,
    Reliability,
}

impl OptimizationProfile {
    pub const ALL: [OptimizationProfile; 3] = [
        OptimizationProfile::Cost,
        OptimizationProfile::Speed,
        OptimizationProfile::Reliability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationProfile::Cost => "cost",
            OptimizationProfile::Speed => "speed",
            OptimizationProfile::Reliability => "reliability",
        }
    }

    pub fn criteria(&self) -> ChainOptimizationCriteria {
        match self {
            OptimizationProfile::Cost => ChainOptimizationCriteria::cost_only(),
            OptimizationProfile::Speed => ChainOptimizationCriteria::speed_only(),
            OptimizationProfile::Reliability => ChainOptimizationCriteria::reliability_only(),
        }
    }
}

impl fmt::Display for OptimizationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick up to `max_count` alternatives, one per profile, from `candidates`.
///
/// `candidates` must already carry their request-criteria scores; those are
/// kept. Each profile contributes its best chain whose tool composition
/// differs from the recommended chain and from earlier picks.
pub fn generate_alternatives(
    candidates: &[ToolChain],
    recommended: &ToolChain,
    max_count: usize,
) -> Vec<ToolChain> {
    let mut picked: Vec<ToolChain> = Vec::new();

    for profile in OptimizationProfile::ALL {
        if picked.len() >= max_count {
            break;
        }
        let criteria = profile.criteria();
        let mut ranked: Vec<(f64, &ToolChain)> = candidates
            .iter()
            .map(|c| (score_chain(c, candidates, &criteria), c))
            .collect();
        ranked.sort_by(|(sa, a), (sb, b)| {
            score_key(*sb)
                .cmp(&score_key(*sa))
                .then_with(|| compare_ranked(a, b))
        });

        let next = ranked.into_iter().find(|(_, c)| {
            !c.same_composition(recommended) && !picked.iter().any(|p| p.same_composition(c))
        });
        if let Some((profile_score, chain)) = next {
            debug!("{} profile picked {} ({:.3})", profile, chain.id, profile_score);
            picked.push(
                chain
                    .clone()
                    .with_metadata("profile", profile.as_str())
                    .with_metadata("profile_score", profile_score),
            );
        }
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Capability, CapabilityRole};
    use crate::chain::ChainStep;
    use crate::discovery::DiscoveredTool;

    fn chain(tool: &str, cost: f64, time: u64, reliability: f64) -> ToolChain {
        ToolChain::from_steps(vec![ChainStep {
            order: 1,
            tool: DiscoveredTool::new(tool, tool, "communication")
                .with_cost(cost)
                .with_reliability(reliability),
            capability: Capability::new("send_email", "communication", CapabilityRole::Consumer),
            relevance_score: 90.0,
            estimated_time_ms: time,
            estimated_cost_usd: cost,
            requires_transformation: false,
            data_flow: None,
        }])
    }

    #[test]
    fn test_each_profile_contributes_a_distinct_chain() {
        let candidates = vec![
            chain("balanced", 0.5, 1000, 0.9),
            chain("cheap", 0.0, 3000, 0.8),
            chain("fast", 2.0, 200, 0.85),
            chain("solid", 1.5, 2000, 0.999),
        ];
        let alternatives = generate_alternatives(&candidates, &candidates[0], 3);
        let ids: Vec<_> = alternatives.iter().map(|c| c.tool_ids()[0]).collect();
        assert_eq!(ids, vec!["cheap", "fast", "solid"]);
        assert_eq!(alternatives[1].metadata["profile"], "speed");
    }

    #[test]
    fn test_count_is_capped_and_recommended_never_repeats() {
        let candidates = vec![chain("only", 0.5, 1000, 0.9), chain("other", 0.6, 900, 0.9)];
        let alternatives = generate_alternatives(&candidates, &candidates[0], 1);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].tool_ids(), vec!["other"]);

        let none = generate_alternatives(&candidates[..1], &candidates[0], 3);
        assert!(none.is_empty());
    }
}

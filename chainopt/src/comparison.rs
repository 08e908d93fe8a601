//! Side-by-side comparison of the recommended chain and its alternatives
//!
//! One row per scoring dimension, one cell per chain. Winners are the best
//! raw values in a row; ties mark every tied cell. Each pair of chains gets
//! one or two plain-language trade-off sentences.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::chain::ToolChain;
use crate::scoring::{ChainOptimizationCriteria, Dimension, DimensionRanges, SCORE_EPSILON};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonCell {
    pub chain_id: String,
    pub raw_value: f64,
    pub normalized_value: f64,
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRow {
    pub dimension: Dimension,
    pub cells: Vec<ComparisonCell>,
}

impl DimensionRow {
    pub fn winners(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .filter(|c| c.is_winner)
            .map(|c| c.chain_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOff {
    pub first_chain_id: String,
    pub second_chain_id: String,
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainComparison {
    pub dimensions: Vec<DimensionRow>,
    pub trade_offs: Vec<TradeOff>,
    pub recommendation_reason: String,
}

impl ChainComparison {
    pub fn row(&self, dimension: Dimension) -> Option<&DimensionRow> {
        self.dimensions.iter().find(|r| r.dimension == dimension)
    }
}

/// Compare `recommended` (first column) with `alternatives`
pub fn build_comparison(
    recommended: &ToolChain,
    alternatives: &[ToolChain],
    criteria: &ChainOptimizationCriteria,
) -> ChainComparison {
    let chains: Vec<&ToolChain> = std::iter::once(recommended).chain(alternatives).collect();
    let ranges = DimensionRanges::from_chains(chains.iter().copied());

    let dimensions: Vec<DimensionRow> = Dimension::ALL
        .into_iter()
        .map(|dimension| {
            let best = chains
                .iter()
                .map(|c| dimension.raw_value(c))
                .fold(None, |acc: Option<f64>, v| match acc {
                    Some(b) if !is_better(dimension, v, b) => Some(b),
                    _ => Some(v),
                });
            let cells = chains
                .iter()
                .map(|c| {
                    let raw = dimension.raw_value(c);
                    ComparisonCell {
                        chain_id: c.id.clone(),
                        raw_value: raw,
                        normalized_value: ranges.normalize(dimension, raw),
                        is_winner: best.is_some_and(|b| (raw - b).abs() < SCORE_EPSILON),
                    }
                })
                .collect();
            DimensionRow { dimension, cells }
        })
        .collect();

    let trade_offs = chains
        .iter()
        .tuple_combinations()
        .map(|(a, b)| TradeOff {
            first_chain_id: a.id.clone(),
            second_chain_id: b.id.clone(),
            sentences: trade_off_sentences(a, b),
        })
        .collect();

    let recommendation_reason = recommendation_reason(recommended, &dimensions, criteria, chains.len());

    ChainComparison {
        dimensions,
        trade_offs,
        recommendation_reason,
    }
}

fn is_better(dimension: Dimension, candidate: f64, current: f64) -> bool {
    if dimension.higher_is_better() {
        candidate > current + SCORE_EPSILON
    } else {
        candidate < current - SCORE_EPSILON
    }
}

/// Strength of `a`'s advantage over `b` on one dimension, as a fraction
fn advantage(dimension: Dimension, a: &ToolChain, b: &ToolChain) -> f64 {
    let (va, vb) = (dimension.raw_value(a), dimension.raw_value(b));
    if !is_better(dimension, va, vb) {
        return 0.0;
    }
    let (better, worse) = (va, vb);
    let base = if dimension.higher_is_better() { worse } else { worse.max(better) };
    if base.abs() < SCORE_EPSILON {
        1.0
    } else {
        (better - worse).abs() / base.abs()
    }
}

fn strongest(a: &ToolChain, b: &ToolChain) -> Option<(Dimension, f64)> {
    Dimension::ALL
        .into_iter()
        .map(|d| (d, advantage(d, a, b)))
        .filter(|(_, adv)| *adv > 0.0)
        .max_by(|(_, x), (_, y)| x.total_cmp(y))
}

fn percent(fraction: f64) -> String {
    format!("{:.0}%", (fraction * 100.0).round())
}

fn winning_phrase(dimension: Dimension, winner: &ToolChain, loser: &ToolChain, fraction: f64) -> String {
    match dimension {
        Dimension::Cost => format!("{} cheaper", percent(fraction)),
        Dimension::Speed => format!("{} faster", percent(fraction)),
        Dimension::Reliability => format!("{} more reliable", percent(fraction)),
        Dimension::Simplicity => simplicity_phrase(winner, loser),
    }
}

fn losing_phrase(dimension: Dimension, loser: &ToolChain, winner: &ToolChain) -> String {
    let (lv, wv) = (dimension.raw_value(loser), dimension.raw_value(winner));
    match dimension {
        Dimension::Cost if wv.abs() < SCORE_EPSILON => "more expensive".to_string(),
        Dimension::Cost => format!("{} more expensive", percent((lv - wv) / wv)),
        Dimension::Speed if wv.abs() < SCORE_EPSILON => "slower".to_string(),
        Dimension::Speed => format!("{} slower", percent((lv - wv) / wv)),
        Dimension::Reliability => format!("{} less reliable", percent((wv - lv) / wv.max(SCORE_EPSILON))),
        Dimension::Simplicity => simplicity_phrase(loser, winner),
    }
}

/// Step and transformation difference of `subject` relative to `other`,
/// worded to follow "is", e.g. "1 step longer yet lighter by 2 transformations"
fn simplicity_phrase(subject: &ToolChain, other: &ToolChain) -> String {
    let steps = subject.step_count() as i64 - other.step_count() as i64;
    let transforms = subject.transformation_count() as i64 - other.transformation_count() as i64;

    let step_part = (steps != 0).then(|| {
        let noun = if steps.abs() == 1 { "step" } else { "steps" };
        let direction = if steps < 0 { "shorter" } else { "longer" };
        format!("{} {} {}", steps.abs(), noun, direction)
    });
    let transform_part = (transforms != 0).then(|| {
        let noun = if transforms.abs() == 1 { "transformation" } else { "transformations" };
        let direction = if transforms < 0 { "lighter" } else { "heavier" };
        format!("{} by {} {}", direction, transforms.abs(), noun)
    });

    match (step_part, transform_part) {
        (Some(s), Some(t)) if steps.signum() != transforms.signum() => format!("{} yet {}", s, t),
        (Some(s), Some(t)) => format!("{} and {}", s, t),
        (Some(s), None) => s,
        (None, Some(t)) => t,
        (None, None) => "equally simple".to_string(),
    }
}

fn trade_off_sentences(a: &ToolChain, b: &ToolChain) -> Vec<String> {
    let a_wins = strongest(a, b);
    let b_wins = strongest(b, a);

    match (a_wins, b_wins) {
        (None, None) => vec![format!(
            "{} and {} are equivalent on every dimension",
            a.name, b.name
        )],
        (Some((da, fa)), Some((db, fb))) => {
            let mut sentences = vec![format!(
                "{} is {} but {} than {}",
                a.name,
                winning_phrase(da, a, b, fa),
                losing_phrase(db, a, b),
                b.name
            )];
            sentences.push(format!(
                "Choose {} when {} matters most; it is {}",
                b.name,
                db,
                winning_phrase(db, b, a, fb)
            ));
            sentences
        }
        (Some((d, f)), None) => vec![format!(
            "{} is {} than {} and no worse on any dimension",
            a.name,
            winning_phrase(d, a, b, f),
            b.name
        )],
        (None, Some((d, f))) => vec![format!(
            "{} is {} than {} and no worse on any dimension",
            b.name,
            winning_phrase(d, b, a, f),
            a.name
        )],
    }
}

fn recommendation_reason(
    recommended: &ToolChain,
    rows: &[DimensionRow],
    criteria: &ChainOptimizationCriteria,
    compared: usize,
) -> String {
    if compared == 1 {
        return format!(
            "{} is the only viable chain (score {:.2}; weights: {})",
            recommended.name,
            recommended.optimization_score,
            criteria.describe()
        );
    }
    let won: Vec<&str> = rows
        .iter()
        .filter(|r| r.winners().any(|id| id == recommended.id))
        .map(|r| r.dimension.as_str())
        .collect();
    if won.is_empty() {
        format!(
            "{} has the best weighted score ({:.2}) without leading any single dimension (weights: {})",
            recommended.name,
            recommended.optimization_score,
            criteria.describe()
        )
    } else {
        format!(
            "{} has the best weighted score ({:.2}) and leads on {} (weights: {})",
            recommended.name,
            recommended.optimization_score,
            won.join(", "),
            criteria.describe()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Capability, CapabilityRole};
    use crate::chain::ChainStep;
    use crate::discovery::DiscoveredTool;

    fn step(capability: &str, tool: &str, cost: f64, time: u64, reliability: f64) -> ChainStep {
        ChainStep {
            order: 1,
            tool: DiscoveredTool::new(tool, tool, "communication")
                .with_cost(cost)
                .with_reliability(reliability),
            capability: Capability::new(capability, "communication", CapabilityRole::Consumer),
            relevance_score: 90.0,
            estimated_time_ms: time,
            estimated_cost_usd: cost,
            requires_transformation: false,
            data_flow: None,
        }
    }

    #[test]
    fn test_each_row_marks_best_raw_value() {
        let a = ToolChain::from_steps(vec![step("send_email", "A", 0.6, 1000, 0.9)]);
        let b = ToolChain::from_steps(vec![step("send_email", "B", 1.0, 500, 0.9)]);
        let comparison = build_comparison(&a, std::slice::from_ref(&b), &ChainOptimizationCriteria::balanced());

        assert_eq!(comparison.dimensions.len(), 4);
        let cost = comparison.row(Dimension::Cost).unwrap();
        assert_eq!(cost.winners().collect::<Vec<_>>(), vec![a.id.as_str()]);
        let speed = comparison.row(Dimension::Speed).unwrap();
        assert_eq!(speed.winners().collect::<Vec<_>>(), vec![b.id.as_str()]);
        let reliability = comparison.row(Dimension::Reliability).unwrap();
        assert_eq!(reliability.winners().count(), 2);
        assert_eq!(reliability.cells[0].normalized_value, 1.0);
    }

    #[test]
    fn test_trade_off_reads_cheaper_but_longer() {
        let a = ToolChain::from_steps(vec![
            step("send_email", "A1", 0.3, 500, 0.9),
            step("send_message", "A2", 0.3, 500, 0.9),
            step("store_data", "A3", 0.0, 500, 0.9),
        ]);
        let b = ToolChain::from_steps(vec![step("send_email", "B", 1.0, 1500, 0.9)]);
        let comparison = build_comparison(&a, std::slice::from_ref(&b), &ChainOptimizationCriteria::balanced());

        assert_eq!(comparison.trade_offs.len(), 1);
        let sentences = &comparison.trade_offs[0].sentences;
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].contains("40% cheaper but 2 steps longer than B"), "{}", sentences[0]);
    }

    #[test]
    fn test_simpler_chain_with_more_steps_is_not_called_shorter() {
        let mut transformed = vec![
            step("data_fetch", "B1", 0.05, 150, 0.9),
            step("send_email", "B2", 0.05, 150, 0.9),
        ];
        for s in &mut transformed {
            s.requires_transformation = true;
        }
        let plain = ToolChain::from_steps(vec![
            step("data_fetch", "A1", 0.1, 100, 0.9),
            step("send_email", "A2", 0.1, 100, 0.9),
            step("store_data", "A3", 0.1, 100, 0.9),
        ]);
        let transformed = ToolChain::from_steps(transformed);
        assert!(Dimension::Simplicity.raw_value(&plain) > Dimension::Simplicity.raw_value(&transformed));

        let comparison = build_comparison(
            &plain,
            std::slice::from_ref(&transformed),
            &ChainOptimizationCriteria::balanced(),
        );
        let first = &comparison.trade_offs[0].sentences[0];
        assert!(first.starts_with("A1 → A2 → A3 is 1 step longer yet lighter by 2 transformations but"), "{}", first);
        assert!(!first.contains("shorter"), "{}", first);
    }

    #[test]
    fn test_single_chain_reason() {
        let a = ToolChain::from_steps(vec![step("send_email", "Gmail", 0.0, 500, 0.9)]);
        let comparison = build_comparison(&a, &[], &ChainOptimizationCriteria::balanced());
        assert!(comparison.trade_offs.is_empty());
        assert!(comparison.recommendation_reason.contains("only viable chain"));
        assert!(comparison.dimensions.iter().all(|r| r.cells[0].is_winner));
    }
}

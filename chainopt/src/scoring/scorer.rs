//! Min-max normalized weighted scoring
//!
//! Normalization is relative to the candidate set being compared, so a score
//! only means something next to the other chains of the same request.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;

use super::criteria::ChainOptimizationCriteria;
use super::dimension::Dimension;
use crate::chain::ToolChain;

/// Scores closer than this are treated as equal
pub const SCORE_EPSILON: f64 = 1e-9;

/// Min and max raw value of every dimension over a candidate set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionRanges {
    bounds: [(f64, f64); 4],
}

impl DimensionRanges {
    pub fn from_chains<'a, I>(chains: I) -> Self
    where
        I: IntoIterator<Item = &'a ToolChain>,
    {
        let mut bounds = [(f64::INFINITY, f64::NEG_INFINITY); 4];
        for chain in chains {
            for (i, dimension) in Dimension::ALL.iter().enumerate() {
                let raw = dimension.raw_value(chain);
                bounds[i].0 = bounds[i].0.min(raw);
                bounds[i].1 = bounds[i].1.max(raw);
            }
        }
        Self { bounds }
    }

    fn bounds(&self, dimension: Dimension) -> (f64, f64) {
        let index = Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .unwrap_or_default();
        self.bounds[index]
    }

    /// Normalized value in [0, 1]; 1.0 is best. A flat range scores 1.0.
    pub fn normalize(&self, dimension: Dimension, raw: f64) -> f64 {
        let (min, max) = self.bounds(dimension);
        let span = max - min;
        if !span.is_finite() || span.abs() < SCORE_EPSILON {
            return 1.0;
        }
        let value = if dimension.higher_is_better() {
            (raw - min) / span
        } else {
            (max - raw) / span
        };
        value.clamp(0.0, 1.0)
    }

    pub fn normalized_value(&self, dimension: Dimension, chain: &ToolChain) -> f64 {
        self.normalize(dimension, dimension.raw_value(chain))
    }
}

/// Weighted score of `chain` relative to `all`
pub fn score_chain(
    chain: &ToolChain,
    all: &[ToolChain],
    criteria: &ChainOptimizationCriteria,
) -> f64 {
    weighted(&DimensionRanges::from_chains(all), chain, criteria)
}

fn weighted(ranges: &DimensionRanges, chain: &ToolChain, criteria: &ChainOptimizationCriteria) -> f64 {
    Dimension::ALL
        .iter()
        .map(|d| criteria.weight(*d) * ranges.normalized_value(*d, chain))
        .sum()
}

/// Set `optimization_score` on every chain against the whole set
pub fn score_chains(chains: &mut [ToolChain], criteria: &ChainOptimizationCriteria) {
    let ranges = DimensionRanges::from_chains(chains.iter());
    for chain in chains.iter_mut() {
        chain.optimization_score = weighted(&ranges, chain, criteria);
    }
}

/// Score snapped to a grid of `SCORE_EPSILON`.
///
/// Sorting on the key is a total order, which plain epsilon equality is not.
/// Non-finite scores sink below every real score.
pub fn score_key(score: f64) -> i64 {
    if score.is_finite() {
        (score / SCORE_EPSILON).round() as i64
    } else {
        i64::MIN
    }
}

/// Best-first ordering: score, then reliability, then fewer steps, then id
pub fn compare_ranked(a: &ToolChain, b: &ToolChain) -> Ordering {
    score_key(b.optimization_score)
        .cmp(&score_key(a.optimization_score))
        .then_with(|| OrderedFloat(b.reliability_score).cmp(&OrderedFloat(a.reliability_score)))
        .then_with(|| a.step_count().cmp(&b.step_count()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Index of the chain to recommend.
///
/// Chains within `tolerance` of the top score form a window; inside it the
/// chain using the most preferred tools wins, then [`compare_ranked`].
pub fn select_best(chains: &[ToolChain], preferred: &[String], tolerance: f64) -> Option<usize> {
    let top = chains
        .iter()
        .map(|c| OrderedFloat(c.optimization_score))
        .max()?
        .into_inner();
    let floor = top - tolerance.max(0.0) - SCORE_EPSILON;

    chains
        .iter()
        .enumerate()
        .filter(|(_, c)| c.optimization_score >= floor)
        .min_by(|(_, a), (_, b)| {
            b.preferred_tool_count(preferred)
                .cmp(&a.preferred_tool_count(preferred))
                .then_with(|| compare_ranked(a, b))
        })
        .map(|(i, _)| i)
}

use serde::{Deserialize, Serialize};

use super::dimension::Dimension;
use crate::error::CriteriaError;

const SUM_EPSILON: f64 = 1e-9;

/// Relative weighting of the four scoring dimensions.
///
/// Weights need not sum to 1.0 when supplied; [`normalized`](Self::normalized)
/// rescales them proportionally and rejects negative or non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChainOptimizationCriteria {
    #[serde(alias = "costWeight")]
    pub cost_weight: f64,
    #[serde(alias = "speedWeight")]
    pub speed_weight: f64,
    #[serde(alias = "reliabilityWeight")]
    pub reliability_weight: f64,
    #[serde(alias = "simplicityWeight")]
    pub simplicity_weight: f64,
}

impl Default for ChainOptimizationCriteria {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ChainOptimizationCriteria {
    /// Validated, normalized criteria
    pub fn new(
        cost_weight: f64,
        speed_weight: f64,
        reliability_weight: f64,
        simplicity_weight: f64,
    ) -> Result<Self, CriteriaError> {
        Self {
            cost_weight,
            speed_weight,
            reliability_weight,
            simplicity_weight,
        }
        .normalized()
    }

    pub fn balanced() -> Self {
        Self {
            cost_weight: 0.25,
            speed_weight: 0.25,
            reliability_weight: 0.25,
            simplicity_weight: 0.25,
        }
    }

    pub fn cost_only() -> Self {
        Self::only(Dimension::Cost)
    }

    pub fn speed_only() -> Self {
        Self::only(Dimension::Speed)
    }

    pub fn reliability_only() -> Self {
        Self::only(Dimension::Reliability)
    }

    fn only(dimension: Dimension) -> Self {
        let mut criteria = Self {
            cost_weight: 0.0,
            speed_weight: 0.0,
            reliability_weight: 0.0,
            simplicity_weight: 0.0,
        };
        *criteria.weight_mut(dimension) = 1.0;
        criteria
    }

    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Cost => self.cost_weight,
            Dimension::Speed => self.speed_weight,
            Dimension::Reliability => self.reliability_weight,
            Dimension::Simplicity => self.simplicity_weight,
        }
    }

    fn weight_mut(&mut self, dimension: Dimension) -> &mut f64 {
        match dimension {
            Dimension::Cost => &mut self.cost_weight,
            Dimension::Speed => &mut self.speed_weight,
            Dimension::Reliability => &mut self.reliability_weight,
            Dimension::Simplicity => &mut self.simplicity_weight,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.weight(*d)).sum()
    }

    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() < SUM_EPSILON
    }

    pub fn validate(&self) -> Result<(), CriteriaError> {
        for dimension in Dimension::ALL {
            let value = self.weight(dimension);
            if !value.is_finite() {
                return Err(CriteriaError::NonFiniteWeight {
                    dimension: dimension.as_str(),
                });
            }
            if value < 0.0 {
                return Err(CriteriaError::NegativeWeight {
                    dimension: dimension.as_str(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Weights rescaled to sum to 1.0; all-zero weights become balanced
    pub fn normalized(&self) -> Result<Self, CriteriaError> {
        self.validate()?;
        let sum = self.sum();
        if sum < SUM_EPSILON {
            return Ok(Self::balanced());
        }
        if self.is_normalized() {
            return Ok(*self);
        }
        let mut scaled = *self;
        for dimension in Dimension::ALL {
            *scaled.weight_mut(dimension) /= sum;
        }
        Ok(scaled)
    }

    /// Dimensions with a non-zero weight, heaviest first
    pub fn ranked_dimensions(&self) -> Vec<Dimension> {
        let mut dims: Vec<Dimension> = Dimension::ALL
            .into_iter()
            .filter(|d| self.weight(*d) > 0.0)
            .collect();
        dims.sort_by(|a, b| self.weight(*b).total_cmp(&self.weight(*a)));
        dims
    }

    pub fn describe(&self) -> String {
        Dimension::ALL
            .iter()
            .map(|d| format!("{} {:.2}", d.as_str(), self.weight(*d)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

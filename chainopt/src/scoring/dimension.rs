use serde::{Deserialize, Serialize};
use std::fmt;

use crate::chain::ToolChain;

/// A scoring axis of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Cost,
    Speed,
    Reliability,
    Simplicity,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Cost,
        Dimension::Speed,
        Dimension::Reliability,
        Dimension::Simplicity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Cost => "cost",
            Dimension::Speed => "speed",
            Dimension::Reliability => "reliability",
            Dimension::Simplicity => "simplicity",
        }
    }

    /// Cost and time are minimized; reliability and simplicity maximized
    pub fn higher_is_better(&self) -> bool {
        matches!(self, Dimension::Reliability | Dimension::Simplicity)
    }

    /// Raw, un-normalized value of this dimension for a chain
    pub fn raw_value(&self, chain: &ToolChain) -> f64 {
        match self {
            Dimension::Cost => chain.total_estimated_cost_usd,
            Dimension::Speed => chain.total_estimated_time_ms as f64,
            Dimension::Reliability => chain.reliability_score,
            Dimension::Simplicity => {
                let units = chain.step_count() + chain.transformation_count();
                if units == 0 {
                    1.0
                } else {
                    1.0 / units as f64
                }
            }
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

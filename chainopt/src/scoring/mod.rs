//! Multi-criteria chain scoring

pub mod criteria;
pub mod dimension;
pub mod scorer;

pub use criteria::ChainOptimizationCriteria;
pub use dimension::Dimension;
pub use scorer::{
    compare_ranked, score_chain, score_chains, score_key, select_best, DimensionRanges,
    SCORE_EPSILON,
};

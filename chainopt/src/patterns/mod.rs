//! Chain outcome telemetry
//!
//! The optimizer never reads these records back. Writes are best-effort:
//! a failing store is logged and ignored.

pub mod recorder;
pub mod store;
pub mod types;

pub use recorder::PatternRecorder;
pub use store::{InMemoryPatternStore, JsonlPatternStore, PatternStore};
pub use types::{ChainFailure, PatternRecord, SuccessfulPattern};

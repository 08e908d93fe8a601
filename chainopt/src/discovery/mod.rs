//! Tool discovery: adapter contract, fan-out and caching
//!
//! The engine never finds tools itself. It asks a `ToolDiscovery`
//! implementation for candidates per capability, concurrently, and keeps
//! successful answers in a bounded cache keyed by capability signature.

pub mod adapter;
pub mod cache;
pub mod catalog;
pub mod fanout;
pub mod matcher;
pub mod types;

pub use adapter::ToolDiscovery;
pub use cache::DiscoveryCache;
pub use catalog::{CatalogDiscovery, CatalogEntry, ToolCatalog};
pub use fanout::{discover_all, DiscoveryOutcome};
pub use types::*;

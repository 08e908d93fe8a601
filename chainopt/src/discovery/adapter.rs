use async_trait::async_trait;

use super::types::ScoredTool;
use crate::analysis::Capability;
use crate::error::DiscoveryError;

/// Source of candidate tools for a capability.
///
/// An empty list means "no tool can fill this capability" and is not an
/// error. Errors are isolated per capability by the fan-out and never abort
/// an optimization.
#[async_trait]
pub trait ToolDiscovery: Send + Sync {
    /// Name of this discovery source for logging
    fn name(&self) -> &str;

    /// Ranked candidates for one capability
    async fn discover(&self, capability: &Capability) -> Result<Vec<ScoredTool>, DiscoveryError>;
}

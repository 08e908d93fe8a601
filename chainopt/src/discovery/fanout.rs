//! Concurrent discovery across capabilities
//!
//! One future per capability, each under its own timeout, joined before chain
//! building starts. A failed or slow call only affects its own capability.

use futures::future::join_all;
use indexmap::IndexMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::adapter::ToolDiscovery;
use super::cache::DiscoveryCache;
use super::types::ScoredTool;
use crate::analysis::{Capability, WarningKind, WorkflowWarning};
use crate::error::DiscoveryError;

/// Gathered candidates for every capability of a goal
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOutcome {
    /// capability name -> candidates, in analysis order; fillable capabilities only
    pub candidates: IndexMap<String, Vec<ScoredTool>>,
    /// Capabilities with no candidate (empty answer, error or timeout)
    pub unfillable: Vec<String>,
    pub warnings: Vec<WorkflowWarning>,
    pub cache_hits: usize,
}

enum Lookup {
    Cached(Vec<ScoredTool>),
    Fetched(Result<Vec<ScoredTool>, DiscoveryError>),
}

pub async fn discover_all(
    adapter: &dyn ToolDiscovery,
    cache: &DiscoveryCache,
    capabilities: &[Capability],
    timeout: Duration,
) -> DiscoveryOutcome {
    debug!(
        "discovering tools for {} capabilities via '{}'",
        capabilities.len(),
        adapter.name()
    );

    let lookups = capabilities.iter().map(|capability| async move {
        if let Some(hit) = cache.get(&capability.signature()) {
            return (capability, Lookup::Cached(hit));
        }
        let fetched = match tokio::time::timeout(timeout, adapter.discover(capability)).await {
            Ok(result) => result,
            Err(_) => Err(DiscoveryError::Timeout {
                capability: capability.name.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        };
        (capability, Lookup::Fetched(fetched))
    });

    let mut outcome = DiscoveryOutcome::default();
    for (capability, lookup) in join_all(lookups).await {
        let tools = match lookup {
            Lookup::Cached(tools) => {
                debug!("discovery cache hit for '{}'", capability.name);
                outcome.cache_hits += 1;
                tools
            }
            Lookup::Fetched(Ok(tools)) => {
                if !tools.is_empty() {
                    cache.insert(capability.signature(), tools.clone());
                }
                tools
            }
            Lookup::Fetched(Err(e)) => {
                warn!("discovery failed for '{}': {}", capability.name, e);
                outcome.unfillable.push(capability.name.clone());
                outcome.warnings.push(WorkflowWarning::for_capability(
                    WarningKind::DiscoveryFailure,
                    &capability.name,
                    format!("Tool discovery failed for '{}': {}", capability.name, e),
                ));
                continue;
            }
        };

        if tools.is_empty() {
            warn!("no tools discovered for '{}'", capability.name);
            outcome.unfillable.push(capability.name.clone());
            outcome.warnings.push(WorkflowWarning::for_capability(
                WarningKind::UnfillableCapability,
                &capability.name,
                format!("No tool was found for capability '{}'", capability.name),
            ));
            continue;
        }

        debug!("'{}': {} candidates", capability.name, tools.len());
        outcome.candidates.insert(capability.name.clone(), tools);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CapabilityRole;
    use crate::discovery::types::DiscoveredTool;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowForMessages {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ToolDiscovery for SlowForMessages {
        fn name(&self) -> &str {
            "slow"
        }

        async fn discover(&self, capability: &Capability) -> Result<Vec<ScoredTool>, DiscoveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match capability.name.as_str() {
                "send_message" => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(vec![])
                }
                "crm_update" => Err(DiscoveryError::Unavailable("registry down".into())),
                "store_data" => Ok(vec![]),
                _ => Ok(vec![ScoredTool::new(
                    DiscoveredTool::new("gmail", "Gmail", "communication"),
                    90.0,
                    "declared",
                )]),
            }
        }
    }

    fn cap(name: &str) -> Capability {
        Capability::new(name, "communication", CapabilityRole::Consumer).with_keywords([name])
    }

    #[tokio::test]
    async fn test_failures_are_isolated_per_capability() {
        let adapter = SlowForMessages {
            calls: AtomicUsize::new(0),
        };
        let cache = DiscoveryCache::new(8);
        let capabilities = vec![
            cap("send_email"),
            cap("send_message"),
            cap("crm_update"),
            cap("store_data"),
        ];

        let outcome =
            discover_all(&adapter, &cache, &capabilities, Duration::from_millis(50)).await;

        assert_eq!(outcome.candidates.len(), 1);
        assert!(outcome.candidates.contains_key("send_email"));
        assert_eq!(
            outcome.unfillable,
            vec!["send_message", "crm_update", "store_data"]
        );
        let kinds: Vec<WarningKind> = outcome.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::DiscoveryFailure,
                WarningKind::DiscoveryFailure,
                WarningKind::UnfillableCapability
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_results_are_cached() {
        let adapter = SlowForMessages {
            calls: AtomicUsize::new(0),
        };
        let cache = DiscoveryCache::new(8);
        let capabilities = vec![cap("send_email"), cap("store_data")];

        discover_all(&adapter, &cache, &capabilities, Duration::from_millis(50)).await;
        let second = discover_all(&adapter, &cache, &capabilities, Duration::from_millis(50)).await;

        assert_eq!(second.cache_hits, 1);
        // store_data returned nothing and is asked again
        assert_eq!(adapter.calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 1);
    }
}

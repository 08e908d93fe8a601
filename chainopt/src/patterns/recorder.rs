//! Fire-and-forget forwarding to an optional pattern store

use std::sync::Arc;
use tracing::{debug, warn};

use super::store::PatternStore;
use super::types::{ChainFailure, SuccessfulPattern};
use crate::chain::ToolChain;

#[derive(Clone, Default)]
pub struct PatternRecorder {
    store: Option<Arc<dyn PatternStore>>,
}

impl std::fmt::Debug for PatternRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRecorder")
            .field("store", &self.store.as_ref().map(|_| "<dyn PatternStore>"))
            .finish()
    }
}

impl PatternRecorder {
    pub fn new(store: Option<Arc<dyn PatternStore>>) -> Self {
        Self { store }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Never fails; store errors are logged
    pub async fn store_successful_pattern(
        &self,
        chain: &ToolChain,
        actual_time_ms: u64,
        actual_cost_usd: f64,
        user_id: &str,
        project_id: Option<&str>,
    ) {
        let Some(store) = &self.store else {
            debug!("no pattern store configured; skipping success for {}", chain.id);
            return;
        };
        let pattern = SuccessfulPattern::from_chain(
            chain,
            actual_time_ms,
            actual_cost_usd,
            user_id,
            project_id.map(String::from),
        );
        if let Some(ratio) = pattern.time_ratio() {
            debug!("chain {} ran at {:.2}x its time estimate", chain.id, ratio);
        }
        if let Err(e) = store.store_success(pattern).await {
            warn!("failed to store successful pattern for {}: {}", chain.id, e);
        }
    }

    /// Never fails; store errors are logged
    pub async fn record_chain_failure(&self, chain: &ToolChain, user_id: &str) {
        let Some(store) = &self.store else {
            debug!("no pattern store configured; skipping failure for {}", chain.id);
            return;
        };
        if let Err(e) = store.record_failure(ChainFailure::from_chain(chain, user_id)).await {
            warn!("failed to record chain failure for {}: {}", chain.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Capability, CapabilityRole};
    use crate::chain::ChainStep;
    use crate::discovery::DiscoveredTool;
    use crate::error::PatternStoreError;
    use crate::patterns::{InMemoryPatternStore, PatternRecord};
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl PatternStore for BrokenStore {
        async fn store_success(&self, _: SuccessfulPattern) -> Result<(), PatternStoreError> {
            Err(PatternStoreError::Unavailable("down".into()))
        }

        async fn record_failure(&self, _: ChainFailure) -> Result<(), PatternStoreError> {
            Err(PatternStoreError::Unavailable("down".into()))
        }
    }

    fn chain() -> ToolChain {
        ToolChain::from_steps(vec![ChainStep {
            order: 1,
            tool: DiscoveredTool::new("gmail", "Gmail", "communication"),
            capability: Capability::new("send_email", "communication", CapabilityRole::Consumer),
            relevance_score: 90.0,
            estimated_time_ms: 1200,
            estimated_cost_usd: 0.0,
            requires_transformation: false,
            data_flow: None,
        }])
    }

    #[tokio::test]
    async fn test_records_reach_the_store() {
        let store = Arc::new(InMemoryPatternStore::new());
        let recorder = PatternRecorder::new(Some(store.clone()));
        let chain = chain();

        recorder.store_successful_pattern(&chain, 1100, 0.0, "u1", Some("p1")).await;
        recorder.record_chain_failure(&chain, "u1").await;

        let records = store.records();
        assert_eq!(records.len(), 2);
        match &records[0] {
            PatternRecord::Success(p) => {
                assert_eq!(p.tool_ids, vec!["gmail"]);
                assert_eq!(p.project_id.as_deref(), Some("p1"));
                assert_eq!(p.estimated_time_ms, 1200);
                let ratio = p.time_ratio().unwrap();
                assert!((ratio - 1100.0 / 1200.0).abs() < 1e-9);
            }
            other => panic!("unexpected record {:?}", other),
        }
        assert!(matches!(records[1], PatternRecord::Failure(_)));
    }

    #[tokio::test]
    async fn test_store_failures_are_swallowed() {
        let recorder = PatternRecorder::new(Some(Arc::new(BrokenStore)));
        let chain = chain();
        recorder.store_successful_pattern(&chain, 1, 0.0, "u1", None).await;
        recorder.record_chain_failure(&chain, "u1").await;

        let disabled = PatternRecorder::default();
        assert!(!disabled.is_enabled());
        disabled.record_chain_failure(&chain, "u1").await;
    }

    #[test]
    fn test_time_ratio_needs_an_estimate() {
        let mut pattern = SuccessfulPattern::from_chain(&chain(), 2400, 0.0, "u1", None);
        assert_eq!(pattern.time_ratio(), Some(2.0));
        pattern.estimated_time_ms = 0;
        assert_eq!(pattern.time_ratio(), None);
    }
}

mod common;

use chainopt::patterns::{JsonlPatternStore, PatternRecord};
use chainopt::{ChainOptimizationRequest, ChainOptimizer};
use common::{tool, MockDiscovery};
use std::sync::Arc;

fn discovery() -> MockDiscovery {
    MockDiscovery::new().with_tool("send_email", tool("gmail", "communication", 0.001, 900, 0.99), 95.0)
}

#[tokio::test]
async fn test_jsonl_store_appends_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patterns").join("chains.jsonl");
    let store = Arc::new(JsonlPatternStore::new(&path));
    let optimizer = ChainOptimizer::new(Arc::new(discovery())).with_pattern_store(store.clone());

    let result = optimizer
        .optimize_chain(&ChainOptimizationRequest::new("Send an email to the team", "user-7"))
        .await
        .unwrap();
    let chain = result.recommended_chain.unwrap();

    optimizer
        .store_successful_pattern(&chain, 850, 0.001, "user-7", Some("launch"))
        .await;
    optimizer.record_chain_failure(&chain, "user-7").await;

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);

    let records = store.read_all().await.unwrap();
    assert_eq!(records.len(), 2);
    match &records[0] {
        PatternRecord::Success(pattern) => {
            assert_eq!(pattern.chain_id, chain.id);
            assert_eq!(pattern.actual_time_ms, 850);
            assert_eq!(pattern.estimated_time_ms, 900);
            assert_eq!(pattern.project_id.as_deref(), Some("launch"));
        }
        other => panic!("expected success record, got {:?}", other),
    }
    assert!(matches!(&records[1], PatternRecord::Failure(f) if f.user_id == "user-7"));
}

#[tokio::test]
async fn test_unwritable_store_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending
    let store = Arc::new(JsonlPatternStore::new(dir.path()));
    let optimizer = ChainOptimizer::new(Arc::new(discovery())).with_pattern_store(store.clone());

    let chain = optimizer
        .optimize_chain(&ChainOptimizationRequest::new("Send an email to the team", "user-7"))
        .await
        .unwrap()
        .recommended_chain
        .unwrap();

    optimizer.store_successful_pattern(&chain, 1, 0.0, "user-7", None).await;
    optimizer.record_chain_failure(&chain, "user-7").await;
    assert!(store.read_all().await.is_err());
}

#[tokio::test]
async fn test_missing_log_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonlPatternStore::new(dir.path().join("absent.jsonl"));
    assert!(store.read_all().await.unwrap().is_empty());
}

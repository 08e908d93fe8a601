#![allow(dead_code)]

use async_trait::async_trait;
use chainopt::analysis::Capability;
use chainopt::discovery::{DiscoveredTool, ScoredTool, ToolDiscovery};
use chainopt::error::DiscoveryError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Discovery adapter answering from a fixed capability -> tools map
#[derive(Default)]
pub struct MockDiscovery {
    tools: HashMap<String, Vec<ScoredTool>>,
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl MockDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, capability: &str, tool: DiscoveredTool, relevance: f64) -> Self {
        self.tools
            .entry(capability.to_string())
            .or_default()
            .push(ScoredTool::new(tool, relevance, format!("mock match for {}", capability)));
        self
    }

    pub fn failing_for(mut self, capability: &str) -> Self {
        self.failing.push(capability.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolDiscovery for MockDiscovery {
    fn name(&self) -> &str {
        "mock"
    }

    async fn discover(&self, capability: &Capability) -> Result<Vec<ScoredTool>, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&capability.name) {
            return Err(DiscoveryError::Unavailable(format!("{} backend down", capability.name)));
        }
        Ok(self.tools.get(&capability.name).cloned().unwrap_or_default())
    }
}

pub fn tool(id: &str, category: &str, cost: f64, latency_ms: u64, reliability: f64) -> DiscoveredTool {
    DiscoveredTool::new(id, capitalize(id), category)
        .with_cost(cost)
        .with_latency(latency_ms)
        .with_reliability(reliability)
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

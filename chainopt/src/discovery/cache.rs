//! Discovery result cache
//!
//! In-memory, bounded and insertion-ordered: when full, the oldest signature
//! is evicted. This is the only state that outlives an optimization call, so
//! callers that need isolation between runs clear it explicitly.

use indexmap::IndexMap;
use std::sync::{Mutex, MutexGuard};

use super::types::ScoredTool;

pub struct DiscoveryCache {
    /// capability signature -> ranked candidates
    entries: Mutex<IndexMap<String, Vec<ScoredTool>>>,
    max_entries: usize,
}

impl DiscoveryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Vec<ScoredTool>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, signature: &str) -> Option<Vec<ScoredTool>> {
        self.lock().get(signature).cloned()
    }

    /// Store candidates, evicting the oldest entry when at capacity
    pub fn insert(&self, signature: impl Into<String>, tools: Vec<ScoredTool>) {
        let signature = signature.into();
        let mut entries = self.lock();
        if !entries.contains_key(&signature) && entries.len() >= self.max_entries {
            if let Some((evicted, _)) = entries.shift_remove_index(0) {
                tracing::debug!("discovery cache full, evicted '{}'", evicted);
            }
        }
        entries.insert(signature, tools);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for DiscoveryCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::types::DiscoveredTool;

    fn scored(id: &str) -> Vec<ScoredTool> {
        vec![ScoredTool::new(
            DiscoveredTool::new(id, id, "communication"),
            80.0,
            "test",
        )]
    }

    #[test]
    fn test_get_insert_clear() {
        let cache = DiscoveryCache::new(4);
        assert!(cache.get("send_email:email").is_none());

        cache.insert("send_email:email", scored("gmail"));
        let cached = cache.get("send_email:email").unwrap();
        assert_eq!(cached[0].tool.id, "gmail");
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_oldest_entry_evicted_when_full() {
        let cache = DiscoveryCache::new(2);
        cache.insert("a", scored("a"));
        cache.insert("b", scored("b"));
        cache.insert("c", scored("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_reinsert_does_not_evict() {
        let cache = DiscoveryCache::new(2);
        cache.insert("a", scored("a"));
        cache.insert("b", scored("b"));
        cache.insert("b", scored("b2"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b").unwrap()[0].tool.id, "b2");
    }
}

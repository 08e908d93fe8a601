//! Static tool catalog discovery
//!
//! A `ToolDiscovery` implementation over a fixed list of tools, loaded from a
//! JSON or TOML file or built in memory. Useful for the CLI, for tests and
//! for deployments that curate their tool list by hand.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::adapter::ToolDiscovery;
use super::matcher::relevance_score;
use super::types::{DiscoveredTool, ScoredTool};
use crate::analysis::Capability;
use crate::error::{ConfigError, DiscoveryError};

/// One catalog tool with the capabilities it declares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub tool: DiscoveredTool,
    /// Capability names this tool fulfills, e.g. `send_email`
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Extra search tags
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCatalog {
    #[serde(default)]
    pub tools: Vec<CatalogEntry>,
}

pub struct CatalogDiscovery {
    catalog: ToolCatalog,
}

impl CatalogDiscovery {
    pub fn new(catalog: ToolCatalog) -> Self {
        Self { catalog }
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self::new(ToolCatalog { tools: entries })
    }

    /// Load a catalog; `.toml` files are parsed as TOML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        let catalog: ToolCatalog = if is_toml {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        tracing::debug!("loaded {} catalog tools from {}", catalog.tools.len(), path.display());
        Ok(Self::new(catalog))
    }

    pub fn len(&self) -> usize {
        self.catalog.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.tools.is_empty()
    }

    /// Synchronous ranking used by the async trait method
    pub fn rank(&self, capability: &Capability) -> Vec<ScoredTool> {
        let mut ranked: Vec<ScoredTool> = self
            .catalog
            .tools
            .iter()
            .filter_map(|entry| {
                let (score, matched) = relevance_score(capability, entry);
                if score <= 0.0 {
                    return None;
                }
                let reason = if matched.is_empty() {
                    format!("declares {}", capability.name)
                } else {
                    format!("matched keywords: {}", matched.join(", "))
                };
                Some(ScoredTool::new(entry.tool.clone(), score, reason))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.relevance_score
                .total_cmp(&a.relevance_score)
                .then_with(|| a.tool.id.cmp(&b.tool.id))
        });
        ranked
    }
}

#[async_trait]
impl ToolDiscovery for CatalogDiscovery {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn discover(&self, capability: &Capability) -> Result<Vec<ScoredTool>, DiscoveryError> {
        Ok(self.rank(capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CapabilityRole;
    use std::io::Write;

    const CATALOG_JSON: &str = r#"{
        "tools": [
            {"id": "gmail", "name": "Gmail", "category": "communication",
             "cost_estimate_usd": 0.001, "capabilities": ["send_email"]},
            {"id": "sendgrid", "name": "SendGrid", "category": "communication",
             "cost_estimate_usd": 0.0005, "capabilities": ["send_email"], "keywords": ["email"]},
            {"id": "slack", "name": "Slack", "category": "communication",
             "capabilities": ["send_message"]}
        ]
    }"#;

    #[tokio::test]
    async fn test_catalog_discovery_ranks_declared_tools() {
        let catalog: ToolCatalog = serde_json::from_str(CATALOG_JSON).unwrap();
        let discovery = CatalogDiscovery::new(catalog);
        let capability = Capability::new("send_email", "communication", CapabilityRole::Consumer)
            .with_keywords(["email"]);

        let tools = discovery.discover(&capability).await.unwrap();
        let ids: Vec<&str> = tools.iter().map(|t| t.tool.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"gmail"));
        assert!(ids.contains(&"sendgrid"));
        assert!(tools[0].relevance_score >= tools[1].relevance_score);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[tools]]
id = "sheets"
name = "Google Sheets"
category = "data"
capabilities = ["spreadsheet_op"]
cost_estimate_usd = 0.0
"#
        )
        .unwrap();

        let discovery = CatalogDiscovery::from_file(file.path()).unwrap();
        assert_eq!(discovery.len(), 1);
    }

    #[test]
    fn test_in_memory_entries_break_ties_by_id() {
        let entry = |id: &str| CatalogEntry {
            tool: DiscoveredTool::new(id, id, "productivity"),
            capabilities: vec!["create_task".to_string()],
            keywords: Vec::new(),
        };
        let discovery = CatalogDiscovery::from_entries(vec![entry("trello"), entry("asana"), entry("jira")]);
        assert_eq!(discovery.len(), 3);
        assert!(CatalogDiscovery::from_entries(Vec::new()).is_empty());

        let capability = Capability::new("create_task", "productivity", CapabilityRole::Consumer);
        let ids: Vec<String> = discovery.rank(&capability).into_iter().map(|t| t.tool.id).collect();
        assert_eq!(ids, vec!["asana", "jira", "trello"]);
    }
}

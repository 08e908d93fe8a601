use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::dataflow::Schema;

/// How a tool authenticates against its provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    #[serde(alias = "oauth")]
    Oauth2,
    ApiKey,
    Basic,
    #[default]
    None,
    #[serde(other)]
    Other,
}

/// A tool returned by discovery. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredTool {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub toolkit_slug: String,
    #[serde(default)]
    pub auth_method: AuthMethod,
    /// Probability of a successful call, in [0, 1]
    #[serde(default = "default_reliability")]
    pub reliability_rating: f64,
    /// Estimated cost per call in USD
    #[serde(default, alias = "cost_estimate")]
    pub cost_estimate_usd: f64,
    /// Composite trust score computed upstream, 0-100
    #[serde(default)]
    pub trust_score: f64,
    #[serde(default = "default_true")]
    pub is_approved: bool,
    /// Typical call latency, when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, JsonValue>,
}

fn default_reliability() -> f64 {
    0.9
}

fn default_true() -> bool {
    true
}

impl DiscoveredTool {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            toolkit_slug: id.clone(),
            id,
            name: name.into(),
            category: category.into(),
            auth_method: AuthMethod::None,
            reliability_rating: default_reliability(),
            cost_estimate_usd: 0.0,
            trust_score: 50.0,
            is_approved: true,
            avg_latency_ms: None,
            input_schema: None,
            output_schema: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_cost(mut self, cost_usd: f64) -> Self {
        self.cost_estimate_usd = cost_usd;
        self
    }

    pub fn with_reliability(mut self, rating: f64) -> Self {
        self.reliability_rating = rating.clamp(0.0, 1.0);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.avg_latency_ms = Some(latency_ms);
        self
    }

    pub fn with_trust(mut self, trust_score: f64) -> Self {
        self.trust_score = trust_score;
        self
    }

    pub fn with_auth(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    pub fn with_schemas(mut self, input: Option<Schema>, output: Option<Schema>) -> Self {
        self.input_schema = input;
        self.output_schema = output;
        self
    }

    pub fn unapproved(mut self) -> Self {
        self.is_approved = false;
        self
    }
}

/// A discovered tool ranked for one capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTool {
    pub tool: DiscoveredTool,
    /// 0-100
    pub relevance_score: f64,
    pub match_reason: String,
}

impl ScoredTool {
    pub fn new(tool: DiscoveredTool, relevance_score: f64, match_reason: impl Into<String>) -> Self {
        Self {
            tool,
            relevance_score: relevance_score.clamp(0.0, 100.0),
            match_reason: match_reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_deserializes_with_defaults() {
        let tool: DiscoveredTool = serde_json::from_value(json!({
            "id": "gmail",
            "name": "Gmail",
            "category": "communication",
            "auth_method": "oauth",
            "cost_estimate": 0.002
        }))
        .unwrap();
        assert_eq!(tool.auth_method, AuthMethod::Oauth2);
        assert_eq!(tool.cost_estimate_usd, 0.002);
        assert_eq!(tool.reliability_rating, 0.9);
        assert!(tool.is_approved);
        assert!(tool.input_schema.is_none());
    }

    #[test]
    fn test_unknown_auth_method() {
        let auth: AuthMethod = serde_json::from_value(json!("saml")).unwrap();
        assert_eq!(auth, AuthMethod::Other);
    }
}

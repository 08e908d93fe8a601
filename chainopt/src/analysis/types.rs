//! Core types produced by goal analysis

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a capability participates in the data flow of a chain.
///
/// Producers are sequenced before transformers, which are sequenced before
/// consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityRole {
    /// Fetches or reads data (fetch, scrape)
    Producer,
    /// Reshapes data (AI processing, file conversion)
    Transformer,
    /// Sends or stores data (email, message, spreadsheet, CRM)
    Consumer,
}

/// An atomic automation need extracted from a goal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    /// Capability name, e.g. `send_email`
    pub name: String,
    /// Tool category, e.g. `communication`
    pub category: String,
    /// Goal words that triggered this capability
    pub keywords: Vec<String>,
    pub role: CapabilityRole,
}

impl Capability {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        role: CapabilityRole,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            keywords: vec![],
            role,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Cache key: name plus sorted keywords
    pub fn signature(&self) -> String {
        let mut keywords = self.keywords.clone();
        keywords.sort();
        keywords.dedup();
        format!("{}:{}", self.name, keywords.join(","))
    }
}

/// Classification of the overall workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowType {
    Notification,
    DataPipeline,
    Scheduled,
    EventTriggered,
    AiProcessing,
    General,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::Notification => "notification",
            WorkflowType::DataPipeline => "data-pipeline",
            WorkflowType::Scheduled => "scheduled",
            WorkflowType::EventTriggered => "event-triggered",
            WorkflowType::AiProcessing => "ai-processing",
            WorkflowType::General => "general",
        }
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
}

/// Kinds of warnings attached to an analysis or an optimization result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    BulkOperation,
    AiOperation,
    SensitiveData,
    UnfillableCapability,
    DiscoveryFailure,
    StepLimit,
    ConstraintRelaxed,
    CriteriaAdjusted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowWarning {
    pub kind: WarningKind,
    pub message: String,
    /// Capability the warning refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
}

impl WorkflowWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            capability: None,
        }
    }

    pub fn for_capability(
        kind: WarningKind,
        capability: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            capability: Some(capability.into()),
        }
    }
}

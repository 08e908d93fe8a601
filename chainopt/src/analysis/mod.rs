//! Capability extraction from natural-language goals
//!
//! Analysis is rule-based and deterministic: an ordered list of keyword rules
//! maps the goal to capabilities, a first-match-wins list classifies the
//! workflow, and a handful of patterns feed the complexity score and the risk
//! warnings. It never fails; a goal nothing matches yields an empty analysis.

pub mod rules;
pub mod types;

pub use types::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::OptimizerConfig;
use rules::{
    count, matches, AI_PATTERN, BULK_PATTERN, CAPABILITY_RULES, CONDITION_PATTERN,
    NOTIFICATION_PATTERN, SCHEDULE_PATTERN, SENSITIVE_PATTERN, TRIGGER_PATTERN,
};

const MAX_COMPLEXITY: f64 = 10.0;
const CONDITION_WEIGHT: f64 = 1.5;
const CATEGORY_WEIGHT: f64 = 0.5;

/// Result of analyzing a workflow goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowAnalysis {
    pub original_goal: String,
    pub extracted_capabilities: Vec<Capability>,
    pub workflow_type: WorkflowType,
    /// 0.0 for an empty goal, at most 10.0
    pub complexity_score: f64,
    pub complexity_level: ComplexityLevel,
    pub warnings: Vec<WorkflowWarning>,
}

impl WorkflowAnalysis {
    pub fn capability(&self, name: &str) -> Option<&Capability> {
        self.extracted_capabilities.iter().find(|c| c.name == name)
    }

    pub fn has_capability(&self, name: &str) -> bool {
        self.capability(name).is_some()
    }
}

/// Analyze a goal with the default thresholds
pub fn analyze_workflow_goal(goal: &str) -> WorkflowAnalysis {
    analyze_workflow_goal_with_config(goal, &OptimizerConfig::default())
}

/// Analyze a goal, deriving the complexity level from `config`
pub fn analyze_workflow_goal_with_config(goal: &str, config: &OptimizerConfig) -> WorkflowAnalysis {
    let text = goal.to_lowercase();

    let capabilities = extract_capabilities(&text);
    let workflow_type = classify_workflow(&text, &capabilities);
    let complexity_score = complexity_score(&text, &capabilities);
    let warnings = risk_warnings(&text);

    debug!(
        "analyzed goal: {} capabilities, type={}, complexity={:.1}",
        capabilities.len(),
        workflow_type,
        complexity_score
    );

    WorkflowAnalysis {
        original_goal: goal.to_string(),
        extracted_capabilities: capabilities,
        workflow_type,
        complexity_score,
        complexity_level: config.complexity_level(complexity_score),
        warnings,
    }
}

fn extract_capabilities(text: &str) -> Vec<Capability> {
    let mut capabilities: Vec<Capability> = Vec::new();

    for rule in CAPABILITY_RULES.iter() {
        let mut keywords: Vec<String> = Vec::new();
        for m in rule.pattern.find_iter(text) {
            let word = m.as_str().to_string();
            if !keywords.contains(&word) {
                keywords.push(word);
            }
        }
        if keywords.is_empty() {
            continue;
        }
        if capabilities.iter().any(|c| c.name == rule.name) {
            continue;
        }
        debug!("rule '{}' fired on {:?}", rule.name, keywords);
        capabilities.push(
            Capability::new(rule.name, rule.category, rule.role).with_keywords(keywords),
        );
    }

    capabilities
}

fn classify_workflow(text: &str, capabilities: &[Capability]) -> WorkflowType {
    let has_role = |role: CapabilityRole| capabilities.iter().any(|c| c.role == role);

    if matches(&NOTIFICATION_PATTERN, text) {
        WorkflowType::Notification
    } else if has_role(CapabilityRole::Producer) && has_role(CapabilityRole::Consumer) {
        WorkflowType::DataPipeline
    } else if matches(&SCHEDULE_PATTERN, text) {
        WorkflowType::Scheduled
    } else if matches(&TRIGGER_PATTERN, text) {
        WorkflowType::EventTriggered
    } else if capabilities.iter().any(|c| c.category == "ai") {
        WorkflowType::AiProcessing
    } else {
        WorkflowType::General
    }
}

/// Grows with capabilities, branching language and distinct categories.
fn complexity_score(text: &str, capabilities: &[Capability]) -> f64 {
    let conditions = count(&CONDITION_PATTERN, text) as f64;
    let categories: BTreeSet<&str> = capabilities.iter().map(|c| c.category.as_str()).collect();
    let category_spread = categories.len().saturating_sub(1) as f64;

    let raw = capabilities.len() as f64
        + CONDITION_WEIGHT * conditions
        + CATEGORY_WEIGHT * category_spread;
    raw.clamp(0.0, MAX_COMPLEXITY)
}

fn risk_warnings(text: &str) -> Vec<WorkflowWarning> {
    let mut warnings = Vec::new();
    if matches(&BULK_PATTERN, text) {
        warnings.push(WorkflowWarning::new(
            WarningKind::BulkOperation,
            "Goal describes a bulk operation; check tool rate limits and batch quotas",
        ));
    }
    if matches(&AI_PATTERN, text) {
        warnings.push(WorkflowWarning::new(
            WarningKind::AiOperation,
            "Goal involves AI processing; outputs may be non-deterministic and incur token costs",
        ));
    }
    if matches(&SENSITIVE_PATTERN, text) {
        warnings.push(WorkflowWarning::new(
            WarningKind::SensitiveData,
            "Goal touches payment, financial or personal data; review tool permissions",
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(analysis: &WorkflowAnalysis) -> Vec<&str> {
        analysis
            .extracted_capabilities
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn test_email_goal_yields_send_email() {
        let analysis = analyze_workflow_goal("Send an email to the team");
        assert_eq!(names(&analysis), vec!["send_email"]);
        assert_eq!(analysis.workflow_type, WorkflowType::General);
        assert!(analysis.warnings.is_empty());
    }

    #[test]
    fn test_email_variants() {
        for goal in [
            "Forward every Gmail attachment to Dropbox",
            "E-mail the weekly digest",
            "check my inbox for invoices",
            "reply to emails from VIP clients",
        ] {
            let analysis = analyze_workflow_goal(goal);
            assert!(analysis.has_capability("send_email"), "goal: {}", goal);
        }
    }

    #[test]
    fn test_data_pipeline_classification() {
        let analysis = analyze_workflow_goal("Fetch orders and send to analytics");
        assert!(analysis.has_capability("data_fetch"));
        assert!(analysis.has_capability("analytics_track"));
        assert_eq!(analysis.workflow_type, WorkflowType::DataPipeline);
    }

    #[test]
    fn test_notification_wins_over_pipeline() {
        let analysis = analyze_workflow_goal("Fetch orders from the API and alert me on Slack");
        assert_eq!(analysis.workflow_type, WorkflowType::Notification);
        assert!(analysis.has_capability("send_message"));
    }

    #[test]
    fn test_duplicate_keywords_produce_one_capability() {
        let analysis = analyze_workflow_goal("email the report and email the invoice by mail");
        let emails = analysis
            .extracted_capabilities
            .iter()
            .filter(|c| c.name == "send_email")
            .count();
        assert_eq!(emails, 1);
        let email = analysis.capability("send_email").unwrap();
        assert_eq!(email.keywords, vec!["email".to_string(), "mail".to_string()]);
    }

    #[test]
    fn test_complexity_grows_with_capabilities() {
        let simple = analyze_workflow_goal("Send an email");
        let complex = analyze_workflow_goal(
            "Fetch orders from the API, summarize them with AI, save to a spreadsheet, \
             create a Jira ticket and email the team if revenue drops",
        );
        assert!(complex.extracted_capabilities.len() >= 5);
        assert!(complex.complexity_score > simple.complexity_score);
        assert_eq!(simple.complexity_level, ComplexityLevel::Simple);
        assert_eq!(complex.complexity_level, ComplexityLevel::Complex);
    }

    #[test]
    fn test_warnings_are_cumulative() {
        let analysis = analyze_workflow_goal(
            "Use AI to summarize all payment emails and post them to Slack",
        );
        let kinds: Vec<WarningKind> = analysis.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::BulkOperation,
                WarningKind::AiOperation,
                WarningKind::SensitiveData
            ]
        );
    }

    #[test]
    fn test_empty_and_nonsense_goals() {
        for goal in ["", "   ", "zxqv blorp"] {
            let analysis = analyze_workflow_goal(goal);
            assert!(analysis.extracted_capabilities.is_empty());
            assert_eq!(analysis.complexity_score, 0.0);
            assert!(analysis.warnings.is_empty());
            assert_eq!(analysis.workflow_type, WorkflowType::General);
        }
    }

    #[test]
    fn test_schedule_and_trigger_types() {
        assert_eq!(
            analyze_workflow_goal("Back up the database daily").workflow_type,
            WorkflowType::Scheduled
        );
        assert_eq!(
            analyze_workflow_goal("When a deal closes, create a task in Asana").workflow_type,
            WorkflowType::EventTriggered
        );
        assert_eq!(
            analyze_workflow_goal("Translate the contract to French").workflow_type,
            WorkflowType::AiProcessing
        );
    }

    #[test]
    fn test_calendar_and_format_goals() {
        let calendar = analyze_workflow_goal("Schedule a call with the client");
        assert!(calendar.has_capability("calendar_event"));

        let format = analyze_workflow_goal("Format the attachment");
        assert!(format.has_capability("file_transform"));
    }

    #[test]
    fn test_capability_signature_is_order_independent() {
        let a = Capability::new("send_email", "communication", CapabilityRole::Consumer)
            .with_keywords(["mail", "email"]);
        let b = Capability::new("send_email", "communication", CapabilityRole::Consumer)
            .with_keywords(["email", "mail"]);
        assert_eq!(a.signature(), b.signature());
        assert_eq!(a.signature(), "send_email:email,mail");
    }
}

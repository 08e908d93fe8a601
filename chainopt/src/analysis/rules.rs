//! Keyword rule tables used by goal analysis
//!
//! All patterns are matched against the lower-cased goal text with word
//! boundaries, so "mail" does not fire inside "gmail" twice and "ai" does not
//! fire inside "maintain".

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::CapabilityRole;

/// A rule that appends one capability when its pattern matches
pub struct CapabilityRule {
    pub name: &'static str,
    pub category: &'static str,
    pub role: CapabilityRole,
    pub pattern: Regex,
}

fn rule(
    name: &'static str,
    category: &'static str,
    role: CapabilityRole,
    pattern: &str,
) -> Option<CapabilityRule> {
    match Regex::new(pattern) {
        Ok(pattern) => Some(CapabilityRule {
            name,
            category,
            role,
            pattern,
        }),
        Err(e) => {
            tracing::error!("invalid capability rule '{}': {}", name, e);
            None
        }
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| tracing::error!("invalid analysis pattern {:?}: {}", pattern, e))
        .ok()
}

// ============================================================================
// Capability rules (ordered; several may fire)
// ============================================================================

pub static CAPABILITY_RULES: Lazy<Vec<CapabilityRule>> = Lazy::new(|| {
    use CapabilityRole::*;
    [
        rule("send_email", "communication", Consumer, r"\b(e-?mails?|gmail|outlook|inbox|mail)\b"),
        rule("send_message", "communication", Consumer, r"\b(slack|messages?|sms|whatsapp|telegram|discord|chat)\b"),
        rule("data_fetch", "data", Producer, r"\b(fetch|fetches|apis?|retrieve|pull|download|import|orders?)\b"),
        rule("web_scrape", "data", Producer, r"\b(scrape|crawl|websites?|webpages?|web page)\b"),
        rule("spreadsheet_op", "data", Consumer, r"\b(spreadsheets?|sheets?|excel|csv|airtable)\b"),
        rule("store_data", "storage", Consumer, r"\b(store|save|database|db|upload|drive|dropbox|backup)\b"),
        rule("analytics_track", "analytics", Consumer, r"\b(analytics|metrics|dashboards?|track|tracking|reports?)\b"),
        rule("crm_update", "crm", Consumer, r"\b(crm|salesforce|hubspot|leads?|contacts?|deals?)\b"),
        rule("calendar_event", "productivity", Consumer, r"\b(calendar|meetings?|appointments?|events?|schedule an?)\b"),
        rule("create_task", "productivity", Consumer, r"\b(tasks?|tickets?|jira|trello|asana|todo|to-do)\b"),
        rule("ai_process", "ai", Transformer, r"\b(summari[sz]e|summary|summaries|classify|translate|ai|gpt|llm|sentiment)\b"),
        rule("file_transform", "data", Transformer, r"\b(convert|transform|pdf|parse|reformat|format)\b"),
        rule("payment_process", "finance", Consumer, r"\b(payments?|invoices?|stripe|charge|billing|refunds?)\b"),
        rule("social_post", "social", Consumer, r"\b(tweet|twitter|linkedin|instagram|facebook)\b"),
    ]
    .into_iter()
    .flatten()
    .collect()
});

// ============================================================================
// Workflow type rules (first match wins, evaluated in the analysis module)
// ============================================================================

pub static NOTIFICATION_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r"\b(notify|notifies|notification|notifications|alert|alerts|remind|reminder)\b")
});

pub static SCHEDULE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r"\b(daily|weekly|hourly|monthly|cron|schedule|scheduled|every (day|morning|evening|night|week|hour|month))\b")
});

pub static TRIGGER_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"\b(when|whenever|once|on new|as soon as)\b"));

// ============================================================================
// Complexity and warning patterns
// ============================================================================

/// Branching language; longer alternatives first so "only if" counts once
pub static CONDITION_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r"\b(only if|depending on|in case|if|when|whenever|unless|otherwise|else)\b")
});

pub static BULK_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| compile(r"\b(all|every|bulk|mass|batch)\b"));

pub static AI_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r"\b(ai|gpt|chatgpt|llm|openai|claude|machine learning|summari[sz]e|classify|sentiment)\b")
});

pub static SENSITIVE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    compile(r"\b(payments?|credit cards?|bank|banking|invoices?|financial|finance|salary|salaries|ssn|social security|passwords?|pii|medical|health records?|tax)\b")
});

/// True when the optional pattern compiled and matches
pub fn matches(pattern: &Lazy<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().map(|re| re.is_match(text)).unwrap_or(false)
}

/// Number of non-overlapping matches of the optional pattern
pub fn count(pattern: &Lazy<Option<Regex>>, text: &str) -> usize {
    pattern
        .as_ref()
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

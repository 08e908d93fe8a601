//! Keyword matching between capabilities and catalog tools
//!
//! Matches what a capability needs (its name plus the goal words that
//! triggered it) against what a tool advertises (declared capabilities, name,
//! category, toolkit and tags).

use super::catalog::CatalogEntry;
use crate::analysis::Capability;

/// Relevance awarded when a tool declares the capability by name
const DECLARED_BASE: f64 = 60.0;
/// Weight of the keyword overlap ratio
const OVERLAP_WEIGHT: f64 = 30.0;
const CATEGORY_BONUS: f64 = 10.0;
/// Undeclared tools need more than this overlap to count as a match
const MIN_UNDECLARED_OVERLAP: f64 = 0.5;

/// Extract keywords from an identifier-ish string.
/// Splits on dots, underscores, dashes, whitespace and camelCase boundaries.
pub fn extract_keywords(name: &str) -> Vec<String> {
    let mut keywords = Vec::new();

    for token in name.split(|c: char| c == '.' || c == '_' || c == '-' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }

        let mut current_word = String::new();
        let mut prev_was_lower = false;
        for c in token.chars() {
            if c.is_uppercase() && prev_was_lower && !current_word.is_empty() {
                keywords.push(current_word.to_lowercase());
                current_word.clear();
            }
            current_word.push(c);
            prev_was_lower = c.is_lowercase();
        }
        if !current_word.is_empty() {
            keywords.push(current_word.to_lowercase());
        }
    }

    keywords.retain(|k| k.len() > 1 && k.chars().any(|c| c.is_alphanumeric()));
    keywords.dedup();
    keywords
}

/// Score a catalog entry for a capability, 0-100. Zero means "not a match".
///
/// Returns the score with the matched keywords for the match reason.
pub fn relevance_score(capability: &Capability, entry: &CatalogEntry) -> (f64, Vec<String>) {
    let mut need_keywords = extract_keywords(&capability.name);
    for keyword in &capability.keywords {
        for kw in extract_keywords(keyword) {
            if !need_keywords.contains(&kw) {
                need_keywords.push(kw);
            }
        }
    }
    if need_keywords.is_empty() {
        return (0.0, vec![]);
    }

    let tool = &entry.tool;
    let mut tool_keywords: Vec<String> = Vec::new();
    for text in [&tool.name, &tool.category, &tool.toolkit_slug, &tool.id]
        .into_iter()
        .chain(entry.keywords.iter())
        .chain(entry.capabilities.iter())
    {
        tool_keywords.extend(extract_keywords(text));
    }

    // Exact or partial keyword matches, e.g. "mail" in "gmail"
    let matched: Vec<String> = need_keywords
        .iter()
        .filter(|need| {
            tool_keywords
                .iter()
                .any(|tk| tk == *need || tk.contains(need.as_str()) || need.contains(tk.as_str()))
        })
        .cloned()
        .collect();
    let overlap = matched.len() as f64 / need_keywords.len() as f64;

    let declared = entry
        .capabilities
        .iter()
        .any(|c| c.eq_ignore_ascii_case(&capability.name));
    if !declared && overlap <= MIN_UNDECLARED_OVERLAP {
        return (0.0, matched);
    }

    let mut score = OVERLAP_WEIGHT * overlap;
    if declared {
        score += DECLARED_BASE;
    }
    if tool.category.eq_ignore_ascii_case(&capability.category) {
        score += CATEGORY_BONUS;
    }
    (score.min(100.0), matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::CapabilityRole;
    use crate::discovery::types::DiscoveredTool;

    fn entry(id: &str, category: &str, capabilities: &[&str]) -> CatalogEntry {
        CatalogEntry {
            tool: DiscoveredTool::new(id, id, category),
            capabilities: capabilities.iter().map(|s| s.to_string()).collect(),
            keywords: vec![],
        }
    }

    #[test]
    fn test_extract_keywords() {
        assert_eq!(extract_keywords("send_email"), vec!["send", "email"]);
        assert_eq!(extract_keywords("listIssues"), vec!["list", "issues"]);
        assert_eq!(extract_keywords("google-sheets.append"), vec!["google", "sheets", "append"]);
    }

    #[test]
    fn test_declared_capability_scores_high() {
        let capability = Capability::new("send_email", "communication", CapabilityRole::Consumer)
            .with_keywords(["email"]);
        let (score, matched) = relevance_score(&capability, &entry("gmail", "communication", &["send_email"]));
        assert!(score >= 90.0, "got {}", score);
        assert!(matched.contains(&"email".to_string()));
    }

    #[test]
    fn test_unrelated_tool_scores_zero() {
        let capability = Capability::new("send_email", "communication", CapabilityRole::Consumer)
            .with_keywords(["email"]);
        let (score, _) = relevance_score(&capability, &entry("stripe", "finance", &["payment_process"]));
        assert_eq!(score, 0.0);
    }
}

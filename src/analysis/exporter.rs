//! Rule export: maps accepted suggestions into the Botify-style
//! segment-rule syntax consumed downstream.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::advisor::Suggestion;

/// Characters not allowed in a segment label.
static LABEL_SANITIZER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_]+").unwrap());

/// Header line that opens every generated rule file.
pub const RULE_FILE_HEADER: &str = "[segment:auto_generated]";

/// A suggestion rendered in the target rule syntax.
///
/// Terminal artifact of the pipeline; only the report layer consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationRule {
    pub suggestion: Suggestion,
    /// Two-line rule: `@<label>` then `path <pattern>`.
    pub rule_pattern: String,
}

/// Renders each suggestion as a segment rule.
///
/// Pure string templating: literal segments are kept verbatim in the
/// path pattern (the suggestion's description already carries the
/// anchoring and continuation wildcards), and the label is the n-gram
/// joined with `_` and sanitized.
pub fn export_rules(suggestions: &[Suggestion]) -> Vec<SegmentationRule> {
    suggestions
        .iter()
        .map(|suggestion| {
            let label = segment_label(suggestion.ngram.segments());
            let rule_pattern = format!("@{}\npath {}", label, suggestion.pattern_description);
            debug!("Exported rule @{} for {}", label, suggestion.ngram);
            SegmentationRule {
                suggestion: suggestion.clone(),
                rule_pattern,
            }
        })
        .collect()
}

/// Renders the complete rule file for the external segmentation
/// consumer: the header line, then one blank-line-separated rule per
/// suggestion.
pub fn render_rule_file(rules: &[SegmentationRule]) -> String {
    let mut blocks = Vec::with_capacity(rules.len() + 1);
    blocks.push(RULE_FILE_HEADER.to_string());
    blocks.extend(rules.iter().map(|r| r.rule_pattern.clone()));
    blocks.join("\n\n")
}

/// Lowercases and joins segments with `_`, stripping anything outside
/// `[a-z0-9_]` so the label is safe in the rule syntax.
fn segment_label(segments: &[String]) -> String {
    let joined = segments.join("_").to_lowercase();
    let cleaned = LABEL_SANITIZER.replace_all(&joined, "_");
    let mut label = cleaned.trim_matches('_').to_string();
    while label.contains("__") {
        label = label.replace("__", "_");
    }
    if label.is_empty() {
        "segment".to_string()
    } else {
        label
    }
}

//! Normalization of raw suggestion records into canonical issues.
//!
//! Upstream records store the faulty line and target selector under
//! multiple historical key names and shapes, so extraction follows a fixed
//! precedence: the camelCase top-level field, then the snake_case one,
//! then the nested `issues[0].htmlWithIssues[0]` structure. Missing
//! intermediate objects and arrays are treated as "not found" and fall
//! through to the next source; nothing here raises.

use serde_json::Value;

use a11yfix_core::issue::{extract_issue_type, Issue};

use crate::types::RawSuggestion;

/// Converts raw suggestion records into issues, discarding invalid ones.
///
/// A record without a non-empty `data.aggregationKey` (or without an id to
/// refer back to it) is dropped; no other field is mandatory.
#[must_use]
pub fn normalize_suggestions(raw: &[RawSuggestion]) -> Vec<Issue> {
    raw.iter().filter_map(normalize_suggestion).collect()
}

/// Normalizes one raw record, or returns `None` when it fails the
/// validity gate.
#[must_use]
pub fn normalize_suggestion(raw: &RawSuggestion) -> Option<Issue> {
    let id = raw.id.as_deref()?;
    let data = &raw.data;
    let aggregation_key = non_empty_str(data, "aggregationKey")?;

    let mut faulty_line = first_non_empty(data, &["faultyLine", "faulty_line"]);
    let mut target_selector = first_non_empty(data, &["targetSelector", "target_selector"]);

    if faulty_line.is_none() || target_selector.is_none() {
        if let Some(html) = first_html_with_issues(data) {
            if target_selector.is_none() {
                target_selector = non_empty_str(html, "target_selector");
            }
            if faulty_line.is_none() {
                faulty_line = non_empty_str(html, "update_from");
            }
        }
    }

    // Last resort for the selector: the third pipe segment of the key.
    let target_selector = target_selector.or_else(|| {
        aggregation_key
            .split('|')
            .nth(2)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
    });

    Some(Issue {
        id: id.to_owned(),
        issue_type: extract_issue_type(&aggregation_key),
        aggregation_key,
        url: non_empty_str(data, "url").unwrap_or_default(),
        faulty_line: faulty_line.unwrap_or_default(),
        target_selector: target_selector.unwrap_or_default(),
        issue_description: first_non_empty(data, &["issueDescription", "issue_description"])
            .unwrap_or_default(),
        opportunity_id: String::new(),
        opportunity_type: String::new(),
    })
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn first_non_empty(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| non_empty_str(value, key))
}

/// Walks `data.issues[0].htmlWithIssues[0]`, the nested shape older
/// records use for selector and markup details.
fn first_html_with_issues(data: &Value) -> Option<&Value> {
    data.get("issues")?
        .as_array()?
        .first()?
        .get("htmlWithIssues")?
        .as_array()?
        .first()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

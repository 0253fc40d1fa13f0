//! The canonical issue model shared across the workspace.

use serde::{Deserialize, Serialize};

/// One concrete accessibility defect instance tied to a URL and a DOM
/// location, normalized from a raw audit suggestion.
///
/// Issues are built fresh per run and never mutated afterwards. The
/// opportunity fields are not derivable from the raw record; the caller
/// attaches them via [`Issue::with_opportunity`] once the owning
/// opportunity is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identifier, unique within one opportunity (not globally).
    pub id: String,
    /// Composite grouping key, conventionally `url|issueType|selector`.
    /// Required for an issue to exist at all.
    pub aggregation_key: String,
    /// Derived from the aggregation key; see [`extract_issue_type`].
    pub issue_type: String,
    pub url: String,
    pub faulty_line: String,
    pub target_selector: String,
    pub issue_description: String,
    pub opportunity_id: String,
    pub opportunity_type: String,
}

impl Issue {
    /// Returns the issue with its owning opportunity attached.
    #[must_use]
    pub fn with_opportunity(mut self, opportunity_id: &str, opportunity_type: &str) -> Self {
        self.opportunity_id = opportunity_id.to_owned();
        self.opportunity_type = opportunity_type.to_owned();
        self
    }
}

/// Extracts the issue type from an aggregation key.
///
/// Keys are pipe-delimited (`url|issueType|selector`); returns the second
/// segment, or the `"unknown"` sentinel when the key has fewer than two
/// segments.
#[must_use]
pub fn extract_issue_type(aggregation_key: &str) -> String {
    aggregation_key
        .split('|')
        .nth(1)
        .map_or_else(|| "unknown".to_string(), str::to_string)
}

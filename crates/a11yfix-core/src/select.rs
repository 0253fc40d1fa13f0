//! Resolution of an operator's choice into a concrete working set.
//!
//! The five selection modes are a tagged variant built once at the CLI
//! boundary ([`SelectionMode::from_flags`]), so mutual exclusivity is
//! checked exactly once, before any lookup or prompt happens. Interactive
//! choice is injected through [`Chooser`] so resolution is deterministic
//! in tests.

use thiserror::Error;

use crate::batch::SendMode;
use crate::group::rank_groups;
use crate::issue::Issue;

/// Ceiling on the number of issues shown when picking by index. Selection
/// correctness does not depend on this; it only bounds the display.
pub const MAX_DISPLAY: usize = 1000;

#[derive(Debug, Error)]
pub enum SelectionError {
    /// Conflicting mode flags, an id absent from the working set, or an
    /// out-of-range index.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The operator interrupted an interactive prompt. A clean outcome,
    /// not a failure.
    #[error("selection cancelled")]
    Cancelled,
}

/// Injectable capability for one interactive choice from a displayed list.
///
/// Implementations present `items` in order and return the zero-based
/// index picked, or `Ok(None)` when the operator cancels.
pub trait Chooser {
    /// # Errors
    ///
    /// Returns [`SelectionError::Cancelled`] when the underlying prompt
    /// cannot complete (terminal gone, interrupt mid-read).
    fn choose(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>, SelectionError>;

    /// Yes/no question. The default renders it as a two-item list;
    /// cancelling counts as "no".
    ///
    /// # Errors
    ///
    /// Same contract as [`Chooser::choose`].
    fn confirm(&mut self, prompt: &str) -> Result<bool, SelectionError> {
        let items = ["Yes".to_string(), "No".to_string()];
        Ok(matches!(self.choose(prompt, &items)?, Some(0)))
    }
}

/// How the operator scopes the working set. Variants are mutually
/// exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// Look up one suggestion id; not-found is fatal.
    ExplicitSingle(String),
    /// Look up an ordered id list; missing ids are skipped with a warning,
    /// fatal only when none resolve.
    ExplicitMulti(Vec<String>),
    /// Pick one issue from the displayed list.
    ByIndex,
    /// Pick an issue type from the frequency-ranked type list.
    ByIssueType,
    /// Pick an aggregation key from the frequency-ranked key list.
    ByAggregationKey,
}

impl SelectionMode {
    /// Builds the selection mode and send mode from the raw CLI flag
    /// combination, enforcing mutual exclusivity up front.
    ///
    /// `suggestion_ids` tokens may arrive space-separated, comma-joined,
    /// or both; they are flattened into one ordered, trimmed,
    /// empty-filtered list here.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidSelection`] when more than one
    /// selection mode is requested, when `--send-all-issues` is combined
    /// with a mode that already defines its own send scope, or when the
    /// id list flattens to nothing.
    pub fn from_flags(
        suggestion_id: Option<&str>,
        suggestion_ids: &[String],
        send_all_issues: bool,
        send_by_issue_type: bool,
        send_by_aggregation_key: bool,
    ) -> Result<(Self, SendMode), SelectionError> {
        let ids = flatten_ids(suggestion_ids);
        if !suggestion_ids.is_empty() && ids.is_empty() {
            return Err(SelectionError::InvalidSelection(
                "no usable suggestion ids provided".to_string(),
            ));
        }

        let mode_flags = [
            suggestion_id.is_some(),
            !ids.is_empty(),
            send_by_issue_type,
            send_by_aggregation_key,
        ];
        if mode_flags.iter().filter(|set| **set).count() > 1 {
            return Err(SelectionError::InvalidSelection(
                "use only one of --suggestion-id, --suggestion-ids, \
                 --send-by-issue-type, --send-by-aggregation-key"
                    .to_string(),
            ));
        }
        if send_all_issues && (send_by_issue_type || send_by_aggregation_key || !ids.is_empty()) {
            return Err(SelectionError::InvalidSelection(
                "--send-all-issues cannot be combined with a mode that already \
                 defines its own send scope"
                    .to_string(),
            ));
        }

        if let Some(id) = suggestion_id {
            let send = if send_all_issues {
                SendMode::AllSameAggregationKey
            } else {
                SendMode::Single
            };
            return Ok((Self::ExplicitSingle(id.to_owned()), send));
        }
        if !ids.is_empty() {
            return Ok((Self::ExplicitMulti(ids), SendMode::ExplicitMultiList));
        }
        if send_by_issue_type {
            return Ok((Self::ByIssueType, SendMode::ByIssueType));
        }
        if send_by_aggregation_key {
            return Ok((Self::ByAggregationKey, SendMode::AllSameAggregationKey));
        }
        let send = if send_all_issues {
            SendMode::AllSameAggregationKey
        } else {
            SendMode::Single
        };
        Ok((Self::ByIndex, send))
    }
}

/// The resolved working set: exactly one issue or a non-empty ordered
/// list, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Single(Issue),
    Multiple(Vec<Issue>),
}

/// Resolves a selection mode against the flat issue collection.
///
/// Interactive modes display their list through `chooser`; explicit modes
/// never prompt.
///
/// # Errors
///
/// - [`SelectionError::InvalidSelection`] when an explicit single id is
///   absent, when none of an explicit id list resolves, when an index
///   falls outside the displayed list, or when there is nothing to choose
///   from.
/// - [`SelectionError::Cancelled`] when the operator interrupts a prompt.
pub fn resolve_selection(
    issues: &[Issue],
    mode: &SelectionMode,
    chooser: &mut dyn Chooser,
) -> Result<Selection, SelectionError> {
    match mode {
        SelectionMode::ExplicitSingle(id) => issues
            .iter()
            .find(|issue| issue.id == *id)
            .cloned()
            .map(Selection::Single)
            .ok_or_else(|| {
                SelectionError::InvalidSelection(format!("suggestion '{id}' not found"))
            }),

        SelectionMode::ExplicitMulti(ids) => {
            let mut picked: Vec<Issue> = Vec::new();
            for id in ids {
                match issues.iter().find(|issue| issue.id == *id) {
                    Some(found) => picked.push(found.clone()),
                    None => {
                        tracing::warn!(suggestion_id = %id, "skipping suggestion \u{2014} not found");
                    }
                }
            }
            if picked.is_empty() {
                return Err(SelectionError::InvalidSelection(
                    "none of the provided suggestion ids were found".to_string(),
                ));
            }
            Ok(Selection::Multiple(picked))
        }

        SelectionMode::ByIndex => {
            let shown: Vec<&Issue> = issues.iter().take(MAX_DISPLAY).collect();
            let items: Vec<String> = shown
                .iter()
                .map(|issue| {
                    format!(
                        "{} | {} | {}",
                        issue.issue_type,
                        truncate(&issue.url, 50),
                        issue.id
                    )
                })
                .collect();
            let index = prompt_index(chooser, "Select suggestion", &items)?;
            Ok(Selection::Single(shown[index].clone()))
        }

        SelectionMode::ByIssueType => {
            let groups = rank_groups(issues, |issue| &issue.issue_type);
            let items: Vec<String> = groups
                .iter()
                .map(|g| format!("{} ({})", g.key, g.count))
                .collect();
            let index = prompt_index(chooser, "Select issue type", &items)?;
            // The representative (first issue in input order carrying this
            // type) seeds the batching stage; members are gathered there.
            Ok(Selection::Single(groups[index].representative.clone()))
        }

        SelectionMode::ByAggregationKey => {
            let groups = rank_groups(issues, |issue| &issue.aggregation_key);
            let items: Vec<String> = groups
                .iter()
                .map(|g| {
                    format!(
                        "{} | {} issues | {}",
                        truncate(&g.key, 70),
                        g.count,
                        g.representative.issue_type
                    )
                })
                .collect();
            let index = prompt_index(chooser, "Select aggregation key", &items)?;
            Ok(Selection::Single(groups[index].representative.clone()))
        }
    }
}

/// Runs one prompt and validates the returned index against the displayed
/// list. Cancellation passes through as its own outcome.
fn prompt_index(
    chooser: &mut dyn Chooser,
    prompt: &str,
    items: &[String],
) -> Result<usize, SelectionError> {
    if items.is_empty() {
        return Err(SelectionError::InvalidSelection(
            "nothing to select from".to_string(),
        ));
    }
    match chooser.choose(prompt, items)? {
        Some(index) if index < items.len() => Ok(index),
        Some(index) => Err(SelectionError::InvalidSelection(format!(
            "selection {} is out of range 1-{}",
            index + 1,
            items.len()
        ))),
        None => Err(SelectionError::Cancelled),
    }
}

/// Splits possibly comma-joined id tokens into one ordered, trimmed,
/// empty-filtered list.
fn flatten_ids(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|token| token.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
#[path = "select_test.rs"]
mod tests;

//! Expansion of a resolved selection into bounded message batches.

use thiserror::Error;

use crate::group::group_in_order;
use crate::issue::Issue;
use crate::select::Selection;

/// Ceiling on batch size for the explicit-multi path.
pub const MAX_BATCH_SIZE: usize = 5;

/// How the working set expands into batches. Derived from the CLI flag
/// path that produced the selection, never chosen independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// One batch containing exactly the selected issue.
    Single,
    /// One batch of every issue sharing the selected issue's aggregation
    /// key. Deliberately uncapped, unlike `ExplicitMultiList` \u{2014} observed
    /// behavior of the workflow this replaces, kept as-is on the
    /// assumption that a single aggregation key stays small.
    AllSameAggregationKey,
    /// One batch per aggregation key among issues of the selected type.
    ByIssueType,
    /// The selection is itself the working set: grouped by aggregation
    /// key in first-seen order, then chunked at the batch ceiling.
    ExplicitMultiList,
}

#[derive(Debug, Error)]
pub enum BatchError {
    /// A filter produced no members.
    #[error("no issues match {0}")]
    EmptyFilter(String),

    /// The selection shape does not fit the send mode (single where a
    /// list is required, or the reverse).
    #[error("selection shape does not match send mode {0:?}")]
    SelectionShape(SendMode),
}

/// One outgoing message: a representative issue providing the message
/// context (url, opportunity, aggregation key) and the ordered member
/// list rendered into `issuesList`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBatch {
    pub representative: Issue,
    pub members: Vec<Issue>,
}

/// Expands a selection into an ordered batch list.
///
/// All paths preserve the originating order of `all_issues` (or of the
/// selection, for the explicit-multi path); grouping never re-sorts
/// within a group.
///
/// # Errors
///
/// - [`BatchError::SelectionShape`] when the selection variant does not
///   match the mode.
/// - [`BatchError::EmptyFilter`] when the by-type filter matches nothing.
pub fn expand_batches(
    selection: &Selection,
    all_issues: &[Issue],
    mode: SendMode,
    max_batch: usize,
) -> Result<Vec<MessageBatch>, BatchError> {
    let max_batch = max_batch.max(1);

    match (mode, selection) {
        (SendMode::Single, Selection::Single(selected)) => Ok(vec![MessageBatch {
            representative: selected.clone(),
            members: vec![selected.clone()],
        }]),

        (SendMode::AllSameAggregationKey, Selection::Single(selected)) => {
            let members: Vec<Issue> = all_issues
                .iter()
                .filter(|issue| issue.aggregation_key == selected.aggregation_key)
                .cloned()
                .collect();
            Ok(vec![MessageBatch {
                representative: selected.clone(),
                members,
            }])
        }

        (SendMode::ByIssueType, Selection::Single(selected)) => {
            let matching: Vec<Issue> = all_issues
                .iter()
                .filter(|issue| issue.issue_type == selected.issue_type)
                .cloned()
                .collect();
            // Cannot normally be empty: the type came off an existing
            // issue. Checked anyway.
            if matching.is_empty() {
                return Err(BatchError::EmptyFilter(format!(
                    "issue type '{}'",
                    selected.issue_type
                )));
            }
            let batches = group_in_order(&matching, |issue| &issue.aggregation_key)
                .into_iter()
                .map(|(_, members)| MessageBatch {
                    representative: members[0].clone(),
                    members,
                })
                .collect();
            Ok(batches)
        }

        (SendMode::ExplicitMultiList, Selection::Multiple(chosen)) => {
            let mut batches: Vec<MessageBatch> = Vec::new();
            for (_, members) in group_in_order(chosen, |issue| &issue.aggregation_key) {
                for chunk in members.chunks(max_batch) {
                    batches.push(MessageBatch {
                        representative: chunk[0].clone(),
                        members: chunk.to_vec(),
                    });
                }
            }
            Ok(batches)
        }

        (mode, _) => Err(BatchError::SelectionShape(mode)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str, key: &str) -> Issue {
        Issue {
            id: id.to_string(),
            aggregation_key: key.to_string(),
            issue_type: crate::issue::extract_issue_type(key),
            url: String::new(),
            faulty_line: String::new(),
            target_selector: String::new(),
            issue_description: String::new(),
            opportunity_id: String::new(),
            opportunity_type: String::new(),
        }
    }

    #[test]
    fn single_mode_emits_one_batch_with_one_member() {
        let all = vec![issue("a", "k|t|1"), issue("b", "k|t|1")];
        let selection = Selection::Single(all[0].clone());
        let batches =
            expand_batches(&selection, &all, SendMode::Single, MAX_BATCH_SIZE).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].members.len(), 1);
        assert_eq!(batches[0].members[0].id, "a");
    }

    #[test]
    fn all_same_key_gathers_every_member_without_a_cap() {
        let mut all: Vec<Issue> = (0..9).map(|n| issue(&format!("i{n}"), "u|t|same")).collect();
        all.push(issue("other", "u|t|different"));
        let selection = Selection::Single(all[0].clone());
        let batches = expand_batches(
            &selection,
            &all,
            SendMode::AllSameAggregationKey,
            MAX_BATCH_SIZE,
        )
        .unwrap();
        assert_eq!(batches.len(), 1);
        // The cap deliberately does not apply in this mode.
        assert_eq!(batches[0].members.len(), 9);
        assert!(batches[0]
            .members
            .iter()
            .all(|i| i.aggregation_key == "u|t|same"));
    }

    #[test]
    fn by_issue_type_emits_one_batch_per_aggregation_key() {
        let all = vec![
            issue("a", "u1|alt-text|s"),
            issue("b", "u2|alt-text|s"),
            issue("c", "u1|alt-text|s"),
            issue("d", "u3|alt-text|s"),
            issue("e", "u1|contrast|s"),
        ];
        let selection = Selection::Single(all[0].clone());
        let batches =
            expand_batches(&selection, &all, SendMode::ByIssueType, MAX_BATCH_SIZE).unwrap();

        assert_eq!(batches.len(), 3);
        for batch in &batches {
            let key = &batch.representative.aggregation_key;
            assert!(batch.members.iter().all(|i| i.aggregation_key == *key));
            assert_eq!(batch.members[0].id, batch.representative.id);
        }
        // Union of members covers every alt-text issue, in input order
        // within each key.
        let ids: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.members.iter().map(|i| i.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn by_issue_type_with_no_match_is_empty_filter() {
        let all = vec![issue("a", "u|alt-text|s")];
        let selection = Selection::Single(issue("ghost", "u|landmarks|s"));
        let result = expand_batches(&selection, &all, SendMode::ByIssueType, MAX_BATCH_SIZE);
        assert!(matches!(result, Err(BatchError::EmptyFilter(_))));
    }

    #[test]
    fn explicit_multi_chunks_at_the_ceiling_preserving_order() {
        let chosen: Vec<Issue> = (0..7).map(|n| issue(&format!("i{n}"), "u|t|k")).collect();
        let selection = Selection::Multiple(chosen.clone());
        let batches = expand_batches(
            &selection,
            &chosen,
            SendMode::ExplicitMultiList,
            MAX_BATCH_SIZE,
        )
        .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].members.len(), 5);
        assert_eq!(batches[1].members.len(), 2);
        assert_eq!(batches[0].representative.id, "i0");
        assert_eq!(batches[1].representative.id, "i5");
        let ids: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.members.iter().map(|i| i.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["i0", "i1", "i2", "i3", "i4", "i5", "i6"]);
    }

    #[test]
    fn explicit_multi_splits_on_key_boundaries_before_capping() {
        let chosen = vec![
            issue("a", "u|t|k1"),
            issue("b", "u|t|k2"),
            issue("c", "u|t|k1"),
        ];
        let selection = Selection::Multiple(chosen.clone());
        let batches = expand_batches(
            &selection,
            &chosen,
            SendMode::ExplicitMultiList,
            MAX_BATCH_SIZE,
        )
        .unwrap();

        assert_eq!(batches.len(), 2);
        // k1 group keeps first-seen order (a then c); k2 follows.
        let first: Vec<&str> = batches[0].members.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(first, vec!["a", "c"]);
        assert_eq!(batches[1].members[0].id, "b");
    }

    #[test]
    fn mismatched_selection_shape_is_rejected() {
        let all = vec![issue("a", "u|t|k")];
        let single = Selection::Single(all[0].clone());
        let multiple = Selection::Multiple(all.clone());

        let result = expand_batches(&multiple, &all, SendMode::Single, MAX_BATCH_SIZE);
        assert!(matches!(result, Err(BatchError::SelectionShape(_))));
        let result = expand_batches(&single, &all, SendMode::ExplicitMultiList, MAX_BATCH_SIZE);
        assert!(matches!(result, Err(BatchError::SelectionShape(_))));
    }
}

//! Order-preserving, frequency-ranked grouping of issues.
//!
//! One generic utility parameterized by a key-extraction function serves
//! both groupings the selector needs (by issue type and by aggregation
//! key), so the ranking and tie-break rules exist in exactly one place.

use std::collections::HashMap;

use crate::issue::Issue;

/// One ranked group: the grouping key, how many issues share it, and the
/// first issue encountered in input order as the display representative.
#[derive(Debug, Clone)]
pub struct RankedGroup {
    pub key: String,
    pub count: usize,
    pub representative: Issue,
}

/// Groups `issues` by `key_fn` and ranks the groups by descending count,
/// breaking ties by ascending key.
///
/// The ordering is a strict total order, so repeated runs over the same
/// input (even reordered within equal ranks) display identically.
#[must_use]
pub fn rank_groups<F>(issues: &[Issue], key_fn: F) -> Vec<RankedGroup>
where
    F: Fn(&Issue) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<RankedGroup> = Vec::new();

    for issue in issues {
        let key = key_fn(issue);
        if let Some(&slot) = index.get(key) {
            groups[slot].count += 1;
        } else {
            index.insert(key.to_owned(), groups.len());
            groups.push(RankedGroup {
                key: key.to_owned(),
                count: 1,
                representative: issue.clone(),
            });
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups
}

/// Groups `issues` by `key_fn`, preserving first-seen key order and input
/// order within each group. No ranking is applied; this is the grouping
/// the batcher uses to split along aggregation-key boundaries.
#[must_use]
pub fn group_in_order<F>(issues: &[Issue], key_fn: F) -> Vec<(String, Vec<Issue>)>
where
    F: Fn(&Issue) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Issue>)> = Vec::new();

    for issue in issues {
        let key = key_fn(issue);
        if let Some(&slot) = index.get(key) {
            groups[slot].1.push(issue.clone());
        } else {
            index.insert(key.to_owned(), groups.len());
            groups.push((key.to_owned(), vec![issue.clone()]));
        }
    }

    groups
}

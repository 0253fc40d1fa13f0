use super::*;
use crate::batch::SendMode;

fn issue(id: &str, key: &str) -> Issue {
    Issue {
        id: id.to_string(),
        aggregation_key: key.to_string(),
        issue_type: crate::issue::extract_issue_type(key),
        url: format!("https://example.com/{id}"),
        faulty_line: String::new(),
        target_selector: String::new(),
        issue_description: String::new(),
        opportunity_id: "opp-1".to_string(),
        opportunity_type: "accessibility".to_string(),
    }
}

/// Chooser that replays a fixed script of outcomes.
struct Scripted(Vec<Option<usize>>);

impl Chooser for Scripted {
    fn choose(&mut self, _prompt: &str, _items: &[String]) -> Result<Option<usize>, SelectionError> {
        if self.0.is_empty() {
            return Err(SelectionError::Cancelled);
        }
        Ok(self.0.remove(0))
    }
}

fn no_prompt() -> Scripted {
    Scripted(vec![])
}

mod from_flags {
    use super::*;

    #[test]
    fn default_is_by_index_single() {
        let (mode, send) = SelectionMode::from_flags(None, &[], false, false, false).unwrap();
        assert_eq!(mode, SelectionMode::ByIndex);
        assert_eq!(send, SendMode::Single);
    }

    #[test]
    fn explicit_single_id() {
        let (mode, send) =
            SelectionMode::from_flags(Some("s1"), &[], false, false, false).unwrap();
        assert_eq!(mode, SelectionMode::ExplicitSingle("s1".to_string()));
        assert_eq!(send, SendMode::Single);
    }

    #[test]
    fn explicit_single_with_send_all_issues() {
        let (_, send) = SelectionMode::from_flags(Some("s1"), &[], true, false, false).unwrap();
        assert_eq!(send, SendMode::AllSameAggregationKey);
    }

    #[test]
    fn explicit_multi_flattens_comma_joined_tokens() {
        let tokens = vec!["a,b".to_string(), " c ".to_string(), ",".to_string()];
        let (mode, send) = SelectionMode::from_flags(None, &tokens, false, false, false).unwrap();
        assert_eq!(
            mode,
            SelectionMode::ExplicitMulti(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string()
            ])
        );
        assert_eq!(send, SendMode::ExplicitMultiList);
    }

    #[test]
    fn id_list_flattening_to_nothing_is_invalid() {
        let tokens = vec![",".to_string(), " ".to_string()];
        let result = SelectionMode::from_flags(None, &tokens, false, false, false);
        assert!(matches!(result, Err(SelectionError::InvalidSelection(_))));
    }

    #[test]
    fn by_issue_type_flag() {
        let (mode, send) = SelectionMode::from_flags(None, &[], false, true, false).unwrap();
        assert_eq!(mode, SelectionMode::ByIssueType);
        assert_eq!(send, SendMode::ByIssueType);
    }

    #[test]
    fn by_aggregation_key_flag() {
        let (mode, send) = SelectionMode::from_flags(None, &[], false, false, true).unwrap();
        assert_eq!(mode, SelectionMode::ByAggregationKey);
        assert_eq!(send, SendMode::AllSameAggregationKey);
    }

    #[test]
    fn conflicting_mode_flags_fail_before_any_lookup() {
        let ids = vec!["a".to_string()];
        for (sid, tokens, by_type, by_key) in [
            (Some("s1"), ids.clone(), false, false),
            (Some("s1"), vec![], true, false),
            (Some("s1"), vec![], false, true),
            (None, ids.clone(), true, false),
            (None, ids, false, true),
            (None, vec![], true, true),
        ] {
            let result = SelectionMode::from_flags(sid, &tokens, false, by_type, by_key);
            assert!(
                matches!(result, Err(SelectionError::InvalidSelection(_))),
                "expected conflict for sid={sid:?} by_type={by_type} by_key={by_key}"
            );
        }
    }

    #[test]
    fn send_all_issues_conflicts_with_scoped_modes() {
        for (tokens, by_type, by_key) in [
            (vec!["a".to_string()], false, false),
            (vec![], true, false),
            (vec![], false, true),
        ] {
            let result = SelectionMode::from_flags(None, &tokens, true, by_type, by_key);
            assert!(matches!(result, Err(SelectionError::InvalidSelection(_))));
        }
    }
}

mod explicit {
    use super::*;

    #[test]
    fn single_id_resolves() {
        let issues = vec![issue("s1", "u|alt-text|a"), issue("s2", "u|alt-text|b")];
        let mode = SelectionMode::ExplicitSingle("s2".to_string());
        let selection = resolve_selection(&issues, &mode, &mut no_prompt()).unwrap();
        assert_eq!(selection, Selection::Single(issues[1].clone()));
    }

    #[test]
    fn single_id_not_found_is_fatal() {
        let issues = vec![issue("s1", "u|alt-text|a")];
        let mode = SelectionMode::ExplicitSingle("missing".to_string());
        let result = resolve_selection(&issues, &mode, &mut no_prompt());
        assert!(matches!(result, Err(SelectionError::InvalidSelection(_))));
    }

    #[test]
    fn multi_skips_missing_ids_and_keeps_order() {
        let issues = vec![issue("a", "u|t|1"), issue("b", "u|t|2")];
        let mode = SelectionMode::ExplicitMulti(vec![
            "a".to_string(),
            "missing".to_string(),
            "b".to_string(),
        ]);
        let selection = resolve_selection(&issues, &mode, &mut no_prompt()).unwrap();
        let Selection::Multiple(picked) = selection else {
            panic!("expected Multiple");
        };
        let ids: Vec<&str> = picked.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn multi_with_no_resolvable_id_is_invalid() {
        let issues = vec![issue("a", "u|t|1")];
        let mode = SelectionMode::ExplicitMulti(vec!["x".to_string(), "y".to_string()]);
        let result = resolve_selection(&issues, &mode, &mut no_prompt());
        assert!(matches!(result, Err(SelectionError::InvalidSelection(_))));
    }
}

mod interactive {
    use super::*;

    #[test]
    fn by_index_picks_from_displayed_list() {
        let issues = vec![issue("a", "u|t|1"), issue("b", "u|t|2")];
        let mut chooser = Scripted(vec![Some(1)]);
        let selection = resolve_selection(&issues, &SelectionMode::ByIndex, &mut chooser).unwrap();
        assert_eq!(selection, Selection::Single(issues[1].clone()));
    }

    #[test]
    fn by_index_out_of_range_is_invalid() {
        let issues = vec![issue("a", "u|t|1")];
        let mut chooser = Scripted(vec![Some(5)]);
        let result = resolve_selection(&issues, &SelectionMode::ByIndex, &mut chooser);
        assert!(matches!(result, Err(SelectionError::InvalidSelection(_))));
    }

    #[test]
    fn interrupt_is_a_distinct_cancelled_outcome() {
        let issues = vec![issue("a", "u|t|1")];
        let mut chooser = Scripted(vec![None]);
        let result = resolve_selection(&issues, &SelectionMode::ByIndex, &mut chooser);
        assert!(matches!(result, Err(SelectionError::Cancelled)));
    }

    #[test]
    fn by_issue_type_resolves_to_first_issue_of_ranked_type() {
        // alt-text has 2 issues and ranks first; contrast second.
        let issues = vec![
            issue("a", "u|contrast|1"),
            issue("b", "u|alt-text|2"),
            issue("c", "u|alt-text|3"),
        ];
        let mut chooser = Scripted(vec![Some(0)]);
        let selection =
            resolve_selection(&issues, &SelectionMode::ByIssueType, &mut chooser).unwrap();
        // Representative is the first alt-text issue in input order.
        assert_eq!(selection, Selection::Single(issues[1].clone()));
    }

    #[test]
    fn by_aggregation_key_resolves_group_representative() {
        let issues = vec![
            issue("a", "u|t|one"),
            issue("b", "u|t|two"),
            issue("c", "u|t|two"),
        ];
        // "u|t|two" has count 2, ranks first.
        let mut chooser = Scripted(vec![Some(0)]);
        let selection =
            resolve_selection(&issues, &SelectionMode::ByAggregationKey, &mut chooser).unwrap();
        assert_eq!(selection, Selection::Single(issues[1].clone()));
    }

    #[test]
    fn empty_issue_list_is_invalid_not_a_prompt() {
        let result = resolve_selection(&[], &SelectionMode::ByIndex, &mut no_prompt());
        assert!(matches!(result, Err(SelectionError::InvalidSelection(_))));
    }
}

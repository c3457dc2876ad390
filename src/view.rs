//! View models derived from the bindings on every refresh.

use clap::ValueEnum;
use serde::Serialize;

use crate::types::{CycleIssueAssociation, Issue, Priority};

/// An issue as listed in the cycle, tagged with its association.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DerivedCycleIssue {
    #[serde(flatten)]
    pub issue: Issue,
    /// Association id, used to address the link rather than the issue.
    pub bridge: String,
    pub cycle: String,
}

/// One entry per association. `None` stays `None` so "loading" and
/// "loaded but empty" remain distinguishable.
pub fn derive_cycle_issues(
    associations: Option<&[CycleIssueAssociation]>,
    cycle_id: &str,
) -> Option<Vec<DerivedCycleIssue>> {
    associations.map(|associations| {
        associations
            .iter()
            .map(|association| DerivedCycleIssue {
                issue: Issue {
                    sub_issues_count: Some(association.sub_issues_count),
                    ..association.issue_detail.clone()
                },
                bridge: association.id.clone(),
                cycle: cycle_id.to_string(),
            })
            .collect()
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    Loading,
    Empty,
    Populated(Vec<DerivedCycleIssue>),
}

impl RenderState {
    pub fn from_derived(derived: Option<Vec<DerivedCycleIssue>>) -> Self {
        match derived {
            None => RenderState::Loading,
            Some(issues) if issues.is_empty() => RenderState::Empty,
            Some(issues) => RenderState::Populated(issues),
        }
    }
}

/// Issues not attached to any cycle yet.
pub fn available_issues(issues: &[Issue]) -> Vec<&Issue> {
    issues.iter().filter(|issue| !issue.in_cycle()).collect()
}

#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub state: Option<String>,
    pub priority: Option<Priority>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(state) = &self.state {
            let name = issue.state_name().to_lowercase();
            if !name.contains(&state.to_lowercase()) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if issue.priority.unwrap_or(Priority::None) != priority {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, issues: &'a [DerivedCycleIssue]) -> Vec<&'a DerivedCycleIssue> {
        issues.iter().filter(|d| self.matches(&d.issue)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    #[default]
    State,
    Priority,
    None,
}

/// Groups keep the order in which their first issue appears, except
/// priority groups which run from urgent to none.
pub fn group_issues<'a>(
    issues: &[&'a DerivedCycleIssue],
    group_by: GroupBy,
) -> Vec<(String, Vec<&'a DerivedCycleIssue>)> {
    let mut groups: Vec<(String, Vec<&'a DerivedCycleIssue>)> = Vec::new();

    match group_by {
        GroupBy::None => {
            groups.push(("All issues".to_string(), issues.to_vec()));
        }
        GroupBy::State | GroupBy::Priority => {
            let mut ordered = issues.to_vec();
            if group_by == GroupBy::Priority {
                ordered.sort_by_key(|d| d.issue.priority.unwrap_or(Priority::None));
            }
            for issue in ordered {
                let label = match group_by {
                    GroupBy::Priority => issue.issue.priority.unwrap_or(Priority::None).label(),
                    _ => issue.issue.state_name(),
                };
                match groups.iter().position(|(group, _)| group == label) {
                    Some(index) => groups[index].1.push(issue),
                    None => groups.push((label.to_string(), vec![issue])),
                }
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{association, issue, issue_in_cycle};
    use crate::types::IssueState;

    #[test]
    fn test_derive_none_stays_none() {
        assert_eq!(derive_cycle_issues(None, "c1"), None);
    }

    #[test]
    fn test_derive_empty_stays_empty() {
        assert_eq!(derive_cycle_issues(Some(&[]), "c1"), Some(vec![]));
    }

    #[test]
    fn test_derive_tags_bridge_and_cycle() {
        let mut assoc = association("b7", issue("i1", "First"), "c1");
        assoc.sub_issues_count = 3;
        let derived = derive_cycle_issues(Some(&[assoc.clone()]), "c1").unwrap();

        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].cycle, "c1");
        assert_eq!(derived[0].bridge, assoc.id);
        assert_eq!(derived[0].issue.id, "i1");
        assert_eq!(derived[0].issue.sub_issues_count, Some(3));
    }

    #[test]
    fn test_derived_serializes_flat() {
        let derived =
            derive_cycle_issues(Some(&[association("b1", issue("i1", "First"), "c1")]), "c1")
                .unwrap();
        let json = serde_json::to_value(&derived[0]).unwrap();
        assert_eq!(json["id"], "i1");
        assert_eq!(json["bridge"], "b1");
        assert_eq!(json["cycle"], "c1");
        assert_eq!(json["sub_issues_count"], 0);
    }

    #[test]
    fn test_render_states_are_exhaustive() {
        assert_eq!(RenderState::from_derived(None), RenderState::Loading);
        assert_eq!(RenderState::from_derived(Some(vec![])), RenderState::Empty);

        let derived =
            derive_cycle_issues(Some(&[association("b1", issue("i1", "First"), "c1")]), "c1");
        assert!(matches!(
            RenderState::from_derived(derived),
            RenderState::Populated(issues) if issues.len() == 1
        ));
    }

    #[test]
    fn test_available_skips_issues_in_a_cycle() {
        let issues = vec![
            issue("i1", "Free"),
            issue_in_cycle("i2", "Taken", "c9"),
            issue("i3", "Also free"),
        ];
        let ids: Vec<&str> = available_issues(&issues).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i3"]);
    }

    #[test]
    fn test_filter_by_state_and_priority() {
        let mut done = issue("i2", "Done one");
        done.state_detail = Some(IssueState {
            id: "s-done".into(),
            name: "Done".into(),
            color: None,
            group: Some("completed".into()),
        });
        done.priority = Some(Priority::Urgent);
        let derived = derive_cycle_issues(
            Some(&[
                association("b1", issue("i1", "Todo one"), "c1"),
                association("b2", done, "c1"),
            ]),
            "c1",
        )
        .unwrap();

        let by_state = IssueFilter {
            state: Some("done".into()),
            priority: None,
        };
        assert_eq!(by_state.apply(&derived).len(), 1);

        let by_priority = IssueFilter {
            state: None,
            priority: Some(Priority::Medium),
        };
        assert_eq!(by_priority.apply(&derived)[0].issue.id, "i1");
    }

    #[test]
    fn test_group_by_priority_orders_urgent_first() {
        let mut urgent = issue("i2", "Urgent one");
        urgent.priority = Some(Priority::Urgent);
        let mut unset = issue("i3", "No priority");
        unset.priority = None;
        let derived = derive_cycle_issues(
            Some(&[
                association("b1", issue("i1", "Medium one"), "c1"),
                association("b2", urgent, "c1"),
                association("b3", unset, "c1"),
            ]),
            "c1",
        )
        .unwrap();
        let refs: Vec<&DerivedCycleIssue> = derived.iter().collect();

        let groups = group_issues(&refs, GroupBy::Priority);
        let labels: Vec<&str> = groups.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["Urgent", "Medium", "None"]);
    }

    #[test]
    fn test_group_by_state_keeps_first_seen_order() {
        let derived = derive_cycle_issues(
            Some(&[
                association("b1", issue("i1", "A"), "c1"),
                association("b2", issue("i2", "B"), "c1"),
            ]),
            "c1",
        )
        .unwrap();
        let refs: Vec<&DerivedCycleIssue> = derived.iter().collect();

        let groups = group_issues(&refs, GroupBy::State);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Todo");
        assert_eq!(groups[0].1.len(), 2);
    }
}

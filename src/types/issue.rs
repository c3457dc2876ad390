use serde::{Deserialize, Serialize};

use super::Priority;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: String,
    #[serde(rename = "name")]
    pub title: String,
    #[serde(default)]
    pub sequence_id: Option<u32>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_detail: Option<IssueState>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub sub_issues_count: Option<u32>,
    /// Back-reference to the cycle association, absent when the issue is in no cycle.
    #[serde(default)]
    pub issue_cycle: Option<IssueCycleRef>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct IssueState {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct IssueCycleRef {
    pub id: String,
    pub cycle: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct IssueList {
    pub results: Vec<Issue>,
}

/// Body of an issue create request.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct IssueDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Body of an issue update request. Only the fields set are changed.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Issue {
    pub fn state_name(&self) -> &str {
        self.state_detail
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("-")
    }

    pub fn in_cycle(&self) -> bool {
        self.issue_cycle.is_some()
    }
}

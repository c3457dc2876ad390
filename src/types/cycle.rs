use serde::{Deserialize, Serialize};

use super::{Issue, User};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Cycle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Single cycle with its owner and progress counters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CycleDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub owned_by: Option<User>,
    #[serde(default)]
    pub total_issues: Option<u32>,
    #[serde(default)]
    pub completed_issues: Option<u32>,
    #[serde(default)]
    pub started_issues: Option<u32>,
}

/// Link record between one issue and one cycle. Its `id` is the bridge id,
/// distinct from the issue's own id.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CycleIssueAssociation {
    pub id: String,
    pub issue: String,
    pub cycle: String,
    pub issue_detail: Issue,
    #[serde(default)]
    pub sub_issues_count: u32,
}

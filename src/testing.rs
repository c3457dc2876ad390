//! In-memory services and fixtures for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{PlaneError, Result};
use crate::services::{
    Ack, AddIssuesRequest, AuthService, CycleService, IssueService, ProjectService,
};
use crate::types::{
    Cycle, CycleDetails, CycleIssueAssociation, Issue, IssueCycleRef, IssueDraft, IssueList,
    IssuePatch, IssueState, Priority, ProjectDetails, ProjectMembership, User,
};

pub fn issue(id: &str, title: &str) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        sequence_id: None,
        priority: Some(Priority::Medium),
        state: Some("s-todo".to_string()),
        state_detail: Some(IssueState {
            id: "s-todo".to_string(),
            name: "Todo".to_string(),
            color: Some("#3a3a3a".to_string()),
            group: Some("unstarted".to_string()),
        }),
        assignees: vec![],
        sub_issues_count: None,
        issue_cycle: None,
    }
}

pub fn issue_in_cycle(id: &str, title: &str, cycle: &str) -> Issue {
    Issue {
        issue_cycle: Some(IssueCycleRef {
            id: format!("bridge-{id}"),
            cycle: cycle.to_string(),
        }),
        ..issue(id, title)
    }
}

pub fn association(bridge: &str, issue: Issue, cycle: &str) -> CycleIssueAssociation {
    CycleIssueAssociation {
        id: bridge.to_string(),
        issue: issue.id.clone(),
        cycle: cycle.to_string(),
        issue_detail: issue,
        sub_issues_count: 0,
    }
}

pub fn cycle_details(id: &str) -> CycleDetails {
    CycleDetails {
        id: id.to_string(),
        name: format!("Sprint {id}"),
        description: None,
        start_date: Some("2026-10-01".to_string()),
        end_date: Some("2026-10-14".to_string()),
        owned_by: None,
        total_issues: Some(0),
        completed_issues: Some(0),
        started_issues: Some(0),
    }
}

fn unavailable() -> PlaneError {
    PlaneError::Api {
        status: 500,
        message: "unavailable".to_string(),
    }
}

/// Fake backend. A `None` resource makes its fetch fail.
#[derive(Default)]
pub struct FakePlane {
    pub user: Option<User>,
    pub role: Option<i32>,
    pub role_fails: bool,
    pub project: Option<ProjectDetails>,
    pub issues: Option<Vec<Issue>>,
    pub cycles: Option<Vec<Cycle>>,
    pub cycle: Option<CycleDetails>,
    pub cycle_issues: Option<Vec<CycleIssueAssociation>>,
    pub add_fails: bool,
    /// Cycle-issue fetches never complete.
    pub stall_cycle_issues: bool,
    pub calls: Mutex<Vec<&'static str>>,
    pub added: Mutex<Vec<(String, AddIssuesRequest)>>,
    pub created: Mutex<Vec<IssueDraft>>,
    pub updated: Mutex<Vec<(String, IssuePatch)>>,
}

impl FakePlane {
    pub fn with_cycle(cycle_id: &str, cycle_issues: Vec<CycleIssueAssociation>) -> Self {
        Self {
            user: Some(User {
                id: "u1".to_string(),
                display_name: Some("ada".to_string()),
                email: None,
            }),
            role: Some(20),
            project: Some(ProjectDetails {
                id: "p1".to_string(),
                name: "Backend".to_string(),
                identifier: Some("BE".to_string()),
            }),
            issues: Some(vec![]),
            cycles: Some(vec![
                Cycle {
                    id: cycle_id.to_string(),
                    name: format!("Sprint {cycle_id}"),
                    start_date: None,
                    end_date: None,
                },
                Cycle {
                    id: "other".to_string(),
                    name: "Sprint other".to_string(),
                    start_date: None,
                    end_date: None,
                },
            ]),
            cycle: Some(cycle_details(cycle_id)),
            cycle_issues: Some(cycle_issues),
            ..Default::default()
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }
}

#[async_trait]
impl AuthService for FakePlane {
    async fn require_session(&self, _cookie: &str) -> Result<Option<User>> {
        self.record("require_session");
        Ok(self.user.clone())
    }

    async fn require_project_role(
        &self,
        _workspace_slug: &str,
        _project_id: &str,
        _cookie: &str,
    ) -> Result<Option<ProjectMembership>> {
        self.record("require_project_role");
        if self.role_fails {
            return Err(unavailable());
        }
        Ok(self.role.map(|role| ProjectMembership { id: None, role }))
    }
}

#[async_trait]
impl ProjectService for FakePlane {
    async fn get_project(&self, _workspace_slug: &str, _project_id: &str) -> Result<ProjectDetails> {
        self.record("get_project");
        self.project.clone().ok_or_else(unavailable)
    }
}

#[async_trait]
impl IssueService for FakePlane {
    async fn get_issues(&self, _workspace_slug: &str, _project_id: &str) -> Result<IssueList> {
        self.record("get_issues");
        self.issues
            .clone()
            .map(|results| IssueList { results })
            .ok_or_else(unavailable)
    }

    async fn add_issues_to_cycle(
        &self,
        _workspace_slug: &str,
        _project_id: &str,
        cycle_id: &str,
        request: &AddIssuesRequest,
    ) -> Result<Ack> {
        self.record("add_issues_to_cycle");
        if self.add_fails {
            return Err(unavailable());
        }
        self.added
            .lock()
            .unwrap()
            .push((cycle_id.to_string(), request.clone()));
        Ok(Ack::default())
    }

    async fn create_issue(
        &self,
        _workspace_slug: &str,
        _project_id: &str,
        draft: &IssueDraft,
    ) -> Result<Issue> {
        self.record("create_issue");
        self.created.lock().unwrap().push(draft.clone());
        Ok(Issue {
            priority: draft.priority,
            ..issue("created-1", &draft.name)
        })
    }

    async fn update_issue(
        &self,
        _workspace_slug: &str,
        _project_id: &str,
        issue_id: &str,
        patch: &IssuePatch,
    ) -> Result<Issue> {
        self.record("update_issue");
        self.updated
            .lock()
            .unwrap()
            .push((issue_id.to_string(), patch.clone()));
        let title = patch.name.clone().unwrap_or_else(|| "updated".to_string());
        Ok(Issue {
            priority: patch.priority,
            state: patch.state.clone(),
            ..issue(issue_id, &title)
        })
    }
}

#[async_trait]
impl CycleService for FakePlane {
    async fn get_cycles(&self, _workspace_slug: &str, _project_id: &str) -> Result<Vec<Cycle>> {
        self.record("get_cycles");
        self.cycles.clone().ok_or_else(unavailable)
    }

    async fn get_cycle_details(
        &self,
        _workspace_slug: &str,
        _project_id: &str,
        _cycle_id: &str,
    ) -> Result<CycleDetails> {
        self.record("get_cycle_details");
        self.cycle.clone().ok_or_else(unavailable)
    }

    async fn get_cycle_issues(
        &self,
        _workspace_slug: &str,
        _project_id: &str,
        _cycle_id: &str,
    ) -> Result<Vec<CycleIssueAssociation>> {
        self.record("get_cycle_issues");
        if self.stall_cycle_issues {
            std::future::pending::<()>().await;
        }
        self.cycle_issues.clone().ok_or_else(unavailable)
    }
}

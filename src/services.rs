//! Service seams the cycle page talks to. `PlaneClient` implements them over
//! HTTP; tests swap in in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{
    Cycle, CycleDetails, CycleIssueAssociation, Issue, IssueDraft, IssueList, IssuePatch,
    ProjectDetails, ProjectMembership, User,
};

/// Batch attach request body.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AddIssuesRequest {
    pub issues: Vec<String>,
}

/// Whatever the server answers to a write. The page never inspects it.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Ack(pub serde_json::Value);

#[async_trait]
pub trait AuthService: Send + Sync {
    /// `Ok(None)` when the cookie carries no valid session.
    async fn require_session(&self, cookie: &str) -> Result<Option<User>>;

    /// `Ok(None)` when the user is not a member of the project.
    async fn require_project_role(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cookie: &str,
    ) -> Result<Option<ProjectMembership>>;
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn get_project(&self, workspace_slug: &str, project_id: &str) -> Result<ProjectDetails>;
}

#[async_trait]
pub trait IssueService: Send + Sync {
    async fn get_issues(&self, workspace_slug: &str, project_id: &str) -> Result<IssueList>;

    async fn add_issues_to_cycle(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cycle_id: &str,
        request: &AddIssuesRequest,
    ) -> Result<Ack>;

    async fn create_issue(
        &self,
        workspace_slug: &str,
        project_id: &str,
        draft: &IssueDraft,
    ) -> Result<Issue>;

    async fn update_issue(
        &self,
        workspace_slug: &str,
        project_id: &str,
        issue_id: &str,
        patch: &IssuePatch,
    ) -> Result<Issue>;
}

#[async_trait]
pub trait CycleService: Send + Sync {
    async fn get_cycles(&self, workspace_slug: &str, project_id: &str) -> Result<Vec<Cycle>>;

    async fn get_cycle_details(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cycle_id: &str,
    ) -> Result<CycleDetails>;

    async fn get_cycle_issues(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cycle_id: &str,
    ) -> Result<Vec<CycleIssueAssociation>>;
}

/// Everything the page needs, behind one handle.
pub trait PlaneServices: AuthService + ProjectService + IssueService + CycleService {}

impl<T> PlaneServices for T where T: AuthService + ProjectService + IssueService + CycleService {}

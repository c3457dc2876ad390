use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PlaneError, Result};
use crate::services::{
    Ack, AddIssuesRequest, AuthService, CycleService, IssueService, ProjectService,
};
use crate::types::{
    Cycle, CycleDetails, CycleIssueAssociation, Issue, IssueDraft, IssueList, IssuePatch,
    ProjectDetails, ProjectMembership, User,
};

const API_PREFIX: &str = "/api";

pub struct PlaneClient {
    http: Client,
    base_url: String,
    cookie: String,
}

impl PlaneClient {
    pub fn new(base_url: String, cookie: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            cookie,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    fn project_path(workspace_slug: &str, project_id: &str) -> String {
        format!("/workspaces/{workspace_slug}/projects/{project_id}")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_cookie(path, &self.cookie).await
    }

    async fn get_with_cookie<T: DeserializeOwned>(&self, path: &str, cookie: &str) -> Result<T> {
        let request = self.http.get(self.url(path)).header("Cookie", cookie);
        self.send(request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self
            .http
            .post(self.url(path))
            .header("Cookie", &self.cookie)
            .json(body);
        self.send(request).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self
            .http
            .patch(self.url(path))
            .header("Cookie", &self.cookie)
            .json(body);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), %status, "response");

        if !status.is_success() {
            return Err(PlaneError::Api {
                status: status.as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            "null"
        } else {
            text.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }
}

/// Maps the listed statuses to `Ok(None)`.
fn absent_on<T>(result: Result<T>, statuses: &[StatusCode]) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(PlaneError::Api { status, .. })
            if statuses.iter().any(|s| s.as_u16() == status) =>
        {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[async_trait]
impl AuthService for PlaneClient {
    async fn require_session(&self, cookie: &str) -> Result<Option<User>> {
        absent_on(
            self.get_with_cookie("/users/me/", cookie).await,
            &[StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN],
        )
    }

    async fn require_project_role(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cookie: &str,
    ) -> Result<Option<ProjectMembership>> {
        let path = format!(
            "{}/project-members/me/",
            Self::project_path(workspace_slug, project_id)
        );
        absent_on(
            self.get_with_cookie(&path, cookie).await,
            &[StatusCode::NOT_FOUND],
        )
    }
}

#[async_trait]
impl ProjectService for PlaneClient {
    async fn get_project(&self, workspace_slug: &str, project_id: &str) -> Result<ProjectDetails> {
        let path = format!("{}/", Self::project_path(workspace_slug, project_id));
        self.get(&path).await
    }
}

#[async_trait]
impl IssueService for PlaneClient {
    async fn get_issues(&self, workspace_slug: &str, project_id: &str) -> Result<IssueList> {
        let path = format!("{}/issues/", Self::project_path(workspace_slug, project_id));
        self.get(&path).await
    }

    async fn add_issues_to_cycle(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cycle_id: &str,
        request: &AddIssuesRequest,
    ) -> Result<Ack> {
        let path = format!(
            "{}/cycles/{cycle_id}/cycle-issues/",
            Self::project_path(workspace_slug, project_id)
        );
        self.post(&path, request).await
    }

    async fn create_issue(
        &self,
        workspace_slug: &str,
        project_id: &str,
        draft: &IssueDraft,
    ) -> Result<Issue> {
        let path = format!("{}/issues/", Self::project_path(workspace_slug, project_id));
        self.post(&path, draft).await
    }

    async fn update_issue(
        &self,
        workspace_slug: &str,
        project_id: &str,
        issue_id: &str,
        patch: &IssuePatch,
    ) -> Result<Issue> {
        let path = format!(
            "{}/issues/{issue_id}/",
            Self::project_path(workspace_slug, project_id)
        );
        self.patch(&path, patch).await
    }
}

#[async_trait]
impl CycleService for PlaneClient {
    async fn get_cycles(&self, workspace_slug: &str, project_id: &str) -> Result<Vec<Cycle>> {
        let path = format!("{}/cycles/", Self::project_path(workspace_slug, project_id));
        self.get(&path).await
    }

    async fn get_cycle_details(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cycle_id: &str,
    ) -> Result<CycleDetails> {
        let path = format!(
            "{}/cycles/{cycle_id}/",
            Self::project_path(workspace_slug, project_id)
        );
        self.get(&path).await
    }

    async fn get_cycle_issues(
        &self,
        workspace_slug: &str,
        project_id: &str,
        cycle_id: &str,
    ) -> Result<Vec<CycleIssueAssociation>> {
        let path = format!(
            "{}/cycles/{cycle_id}/cycle-issues/",
            Self::project_path(workspace_slug, project_id)
        );
        self.get(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> Result<()> {
        Err(PlaneError::Api {
            status,
            message: String::new(),
        })
    }

    #[test]
    fn test_url_joins_api_prefix() {
        let client = PlaneClient::new("https://plane.example.com".into(), "sid=1".into());
        assert_eq!(
            client.url("/users/me/"),
            "https://plane.example.com/api/users/me/"
        );
    }

    #[test]
    fn test_absent_on_listed_status() {
        let result = absent_on(api_error(401), &[StatusCode::UNAUTHORIZED]);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_absent_on_passes_other_errors() {
        let result = absent_on(api_error(500), &[StatusCode::UNAUTHORIZED]);
        assert!(matches!(result, Err(PlaneError::Api { status: 500, .. })));
    }
}

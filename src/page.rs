//! The cycle page: gate, bindings, view state and the user actions.

use serde::Serialize;
use serde_json::Value;

use crate::auth::{AccessGate, GateOutcome, RoleFlags};
use crate::bindings::{cycle_issues_key, project_issues_key, PageData};
use crate::cache::FetchCache;
use crate::error::{PlaneError, Result};
use crate::route::{cycle_page_path, RouteParams};
use crate::services::{AddIssuesRequest, PlaneServices};
use crate::state::{ActionType, ViewState};
use crate::types::{CycleDetails, Issue, IssueDraft, IssuePatch, Priority};
use crate::view::{self, DerivedCycleIssue, RenderState};

pub enum PageOpen<S> {
    Redirect(String),
    Ready(CyclePage<S>),
}

/// Entry of the cycle switcher menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleLink {
    pub id: String,
    pub name: String,
    pub path: String,
    pub current: bool,
}

pub struct CyclePage<S> {
    services: S,
    cache: FetchCache,
    params: RouteParams,
    roles: RoleFlags,
    data: PageData,
    pub view: ViewState,
}

impl<S: PlaneServices> CyclePage<S> {
    /// Run the access gate. Nothing is fetched for the page unless it passes.
    pub async fn open(
        services: S,
        cache: FetchCache,
        params: RouteParams,
        cookie: &str,
        requested_path: &str,
    ) -> Result<PageOpen<S>> {
        match AccessGate::check(&services, cookie, &params, requested_path).await? {
            GateOutcome::Redirect { location } => Ok(PageOpen::Redirect(location)),
            GateOutcome::Render(roles) => Ok(PageOpen::Ready(Self {
                services,
                cache,
                params,
                roles,
                data: PageData::default(),
                view: ViewState::default(),
            })),
        }
    }

    pub fn roles(&self) -> RoleFlags {
        self.roles
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn data(&self) -> &PageData {
        &self.data
    }

    #[cfg(test)]
    pub fn services(&self) -> &S {
        &self.services
    }

    #[cfg(test)]
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    fn cycle_id(&self) -> &str {
        self.params.cycle_id.as_deref().unwrap_or_default()
    }

    pub async fn refresh(&mut self) {
        self.data = PageData::load(&mut self.cache, &self.services, &self.params).await;
    }

    pub fn derived_issues(&self) -> Option<Vec<DerivedCycleIssue>> {
        view::derive_cycle_issues(self.data.cycle_issues.as_deref(), self.cycle_id())
    }

    pub fn render_state(&self) -> RenderState {
        RenderState::from_derived(self.derived_issues())
    }

    pub fn cycle(&self) -> Option<&CycleDetails> {
        self.data.cycle.as_ref()
    }

    /// Project issues that can be added to this cycle.
    pub fn available_issues(&self) -> Vec<&Issue> {
        self.data
            .issues
            .as_deref()
            .map(view::available_issues)
            .unwrap_or_default()
    }

    /// Look an issue up in the cycle first, then in the project.
    pub fn find_issue(&self, issue_id: &str) -> Option<Issue> {
        let in_cycle = self
            .data
            .cycle_issues
            .iter()
            .flatten()
            .map(|assoc| &assoc.issue_detail);
        let in_project = self.data.issues.iter().flatten();
        in_cycle
            .chain(in_project)
            .find(|issue| issue.id == issue_id)
            .cloned()
    }

    pub fn open_issues_list_modal(&mut self) {
        self.view.open_issues_list_modal();
    }

    pub fn open_create_issue_modal(&mut self, issue: Option<Issue>, action_type: ActionType) {
        self.view.open_create_issue_modal(issue, action_type);
    }

    /// Attach `issue_ids` to the cycle in one request. On success only the
    /// cycle-issue entry is invalidated; the refetch is left to the next refresh.
    pub async fn submit_issues(&mut self, issue_ids: Vec<String>) -> Result<()> {
        if issue_ids.is_empty() {
            return Err(PlaneError::NoIssuesSelected);
        }
        let (workspace, project, cycle) = require_cycle_scope(&self.params)?;
        let request = AddIssuesRequest { issues: issue_ids };

        match self
            .services
            .add_issues_to_cycle(workspace, project, cycle, &request)
            .await
        {
            Ok(ack) => {
                tracing::info!(cycle, count = request.issues.len(), "issues added to cycle");
                tracing::debug!(response = %ack.0, "add issues acknowledged");
                if let Some(key) = cycle_issues_key(&self.params) {
                    self.cache.invalidate(&key);
                }
                self.view.close_issues_list_modal();
                Ok(())
            }
            Err(e) => {
                tracing::error!(cycle, error = %e, "adding issues to cycle failed");
                self.view.banner = Some(format!("Could not add issues to the cycle: {e}"));
                Err(e)
            }
        }
    }

    /// Create an issue from the modal prefill and attach it to this cycle.
    pub async fn create_issue(&mut self, mut draft: IssueDraft) -> Result<Issue> {
        self.require_modal(ActionType::Create)?;
        let prefill = self.view.issue_modal_prefill(self.cycle_id());
        if draft.state.is_none() {
            draft.state = prefill.get("state").and_then(Value::as_str).map(String::from);
        }
        if draft.priority.is_none() {
            draft.priority = prefill
                .get("priority")
                .and_then(|p| serde_json::from_value::<Priority>(p.clone()).ok());
        }

        let (workspace, project, cycle) = require_cycle_scope(&self.params)?;
        let issue = match self.services.create_issue(workspace, project, &draft).await {
            Ok(issue) => issue,
            Err(e) => {
                tracing::error!(cycle, error = %e, "creating cycle issue failed");
                self.view.banner = Some(format!("Could not create the issue: {e}"));
                return Err(e);
            }
        };
        tracing::info!(issue = %issue.id, "issue created");
        if let Some(key) = project_issues_key(&self.params) {
            self.cache.invalidate(&key);
        }

        // The issue exists from here on; a retry must attach it, not create it again.
        self.view.close_issue_modal();
        let request = AddIssuesRequest {
            issues: vec![issue.id.clone()],
        };
        if let Err(e) = self
            .services
            .add_issues_to_cycle(workspace, project, cycle, &request)
            .await
        {
            tracing::error!(cycle, issue = %issue.id, error = %e, "attaching new issue failed");
            self.view.banner = Some(format!(
                "Issue {} was created but not added to the cycle: {e}",
                issue.id
            ));
            return Err(PlaneError::AttachFailed {
                issue: issue.id,
                source: Box::new(e),
            });
        }

        if let Some(key) = cycle_issues_key(&self.params) {
            self.cache.invalidate(&key);
        }
        Ok(issue)
    }

    /// Send the changes for the issue selected for editing.
    pub async fn update_issue(&mut self, patch: IssuePatch) -> Result<Issue> {
        self.require_modal(ActionType::Edit)?;
        let issue_id = match &self.view.selected_issue {
            Some(selected) => selected.issue.id.clone(),
            None => return Err(PlaneError::IssueModalClosed),
        };

        let (workspace, project) = self
            .params
            .project_scope()
            .ok_or_else(|| PlaneError::InvalidPagePath(format!("{:?}", self.params)))?;
        match self
            .services
            .update_issue(workspace, project, &issue_id, &patch)
            .await
        {
            Ok(issue) => {
                tracing::info!(issue = %issue.id, "issue updated");
                for key in [cycle_issues_key(&self.params), project_issues_key(&self.params)]
                    .into_iter()
                    .flatten()
                {
                    self.cache.invalidate(&key);
                }
                self.view.close_issue_modal();
                Ok(issue)
            }
            Err(e) => {
                tracing::error!(issue = %issue_id, error = %e, "updating issue failed");
                self.view.banner = Some(format!("Could not update issue {issue_id}: {e}"));
                Err(e)
            }
        }
    }

    fn require_modal(&self, expected: ActionType) -> Result<()> {
        if !self.view.is_issue_modal_visible() {
            return Err(PlaneError::IssueModalClosed);
        }
        let found = self.view.modal_action();
        if found != expected {
            return Err(PlaneError::ModalMismatch {
                expected: expected.as_str(),
                found: found.as_str(),
            });
        }
        Ok(())
    }

    /// Sibling cycles, each linking to its own page.
    pub fn cycle_switcher(&self) -> Vec<CycleLink> {
        let (Some((workspace, project)), Some(cycles)) =
            (self.params.project_scope(), self.data.cycles.as_ref())
        else {
            return Vec::new();
        };

        cycles
            .iter()
            .map(|cycle| CycleLink {
                id: cycle.id.clone(),
                name: cycle.name.clone(),
                path: cycle_page_path(workspace, project, &cycle.id),
                current: cycle.id == self.cycle_id(),
            })
            .collect()
    }

    pub fn breadcrumbs(&self) -> Vec<String> {
        vec![
            "Projects".to_string(),
            self.data
                .project
                .as_ref()
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "...".to_string()),
            "Cycles".to_string(),
            self.data
                .cycle
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "...".to_string()),
        ]
    }

    pub fn toggle_side_panel(&mut self) {
        self.view.toggle_side_panel();
    }
}

fn require_cycle_scope(params: &RouteParams) -> Result<(&str, &str, &str)> {
    params
        .cycle_scope()
        .ok_or_else(|| PlaneError::InvalidPagePath(format!("{params:?}")))
}

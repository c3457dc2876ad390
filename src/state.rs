//! Local UI state of the cycle page: modals, selection and side panel.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Create,
    Edit,
    Delete,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

/// Issue picked for the create/update modal, with what the user meant to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedIssue {
    #[serde(flatten)]
    pub issue: Issue,
    #[serde(rename = "actionType")]
    pub action_type: ActionType,
}

pub type IssuePrefill = Map<String, Value>;

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub issue_modal_open: bool,
    pub selected_issue: Option<SelectedIssue>,
    /// Template that seeds the create modal, e.g. a state picked from a list group.
    pub preloaded_data: Option<IssuePrefill>,
    pub issues_list_modal_open: bool,
    pub side_panel_collapsed: bool,
    /// Transient message from a failed write.
    pub banner: Option<String>,
}

impl ViewState {
    pub fn open_create_issue_modal(&mut self, issue: Option<Issue>, action_type: ActionType) {
        match issue {
            Some(issue) => {
                self.preloaded_data = None;
                self.selected_issue = Some(SelectedIssue { issue, action_type });
            }
            None => self.selected_issue = None,
        }
        self.issue_modal_open = true;
    }

    /// Pure create, seeded with `template`.
    pub fn open_create_issue_with(&mut self, template: IssuePrefill) {
        self.selected_issue = None;
        self.preloaded_data = Some(template);
        self.issue_modal_open = true;
    }

    pub fn close_issue_modal(&mut self) {
        self.issue_modal_open = false;
        self.selected_issue = None;
        self.preloaded_data = None;
    }

    /// Deletion is handled elsewhere, so a delete selection keeps the modal shut.
    pub fn is_issue_modal_visible(&self) -> bool {
        let deleting = self
            .selected_issue
            .as_ref()
            .is_some_and(|s| s.action_type == ActionType::Delete);
        self.issue_modal_open && !deleting
    }

    /// What submitting the issue modal does. No selection means a new issue.
    pub fn modal_action(&self) -> ActionType {
        self.selected_issue
            .as_ref()
            .map_or(ActionType::Create, |s| s.action_type)
    }

    /// The template wins over the selection. The cycle id is always injected.
    pub fn issue_modal_prefill(&self, cycle_id: &str) -> IssuePrefill {
        let mut prefill = match (&self.preloaded_data, &self.selected_issue) {
            (Some(template), _) => template.clone(),
            (None, Some(selected)) => match serde_json::to_value(selected) {
                Ok(Value::Object(fields)) => fields,
                _ => Map::new(),
            },
            (None, None) => Map::new(),
        };
        prefill.insert("cycle".to_string(), Value::String(cycle_id.to_string()));
        prefill
    }

    pub fn open_issues_list_modal(&mut self) {
        self.issues_list_modal_open = true;
    }

    pub fn close_issues_list_modal(&mut self) {
        self.issues_list_modal_open = false;
    }

    pub fn toggle_side_panel(&mut self) {
        self.side_panel_collapsed = !self.side_panel_collapsed;
    }

    pub fn take_banner(&mut self) -> Option<String> {
        self.banner.take()
    }
}

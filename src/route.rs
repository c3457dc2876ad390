//! Page path parsing for `/<workspace>/projects/<project>/cycles/<cycle>`.

use url::{form_urlencoded, Url};

use crate::error::{PlaneError, Result};

const SIGN_IN_PATH: &str = "/signin";

/// Route parameters of a cycle page. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub workspace_slug: Option<String>,
    pub project_id: Option<String>,
    pub cycle_id: Option<String>,
}

impl RouteParams {
    /// Parse a bare path or a full URL. Only the segments present are filled in.
    pub fn parse(input: &str) -> Result<Self> {
        let path = if has_http_scheme(input) {
            Url::parse(input)
                .map_err(|_| PlaneError::InvalidUrl(input.to_string()))?
                .path()
                .to_string()
        } else {
            input
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string()
        };

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let segment = |index: usize| segments.get(index).copied().and_then(non_empty);

        let workspace_slug = segment(0);
        let project_id = match segments.get(1) {
            Some(&"projects") => segment(2),
            _ => None,
        };
        let cycle_id = match (project_id.is_some(), segments.get(3)) {
            (true, Some(&"cycles")) => segment(4),
            _ => None,
        };

        Ok(Self {
            workspace_slug,
            project_id,
            cycle_id,
        })
    }

    /// Parse and require every parameter, for commands that act on one cycle.
    pub fn parse_complete(input: &str) -> Result<Self> {
        let params = Self::parse(input)?;
        if params.page_path().is_none() {
            return Err(PlaneError::InvalidPagePath(input.to_string()));
        }
        Ok(params)
    }

    /// Workspace and project, when both are present.
    pub fn project_scope(&self) -> Option<(&str, &str)> {
        Some((self.workspace_slug.as_deref()?, self.project_id.as_deref()?))
    }

    /// Workspace, project and cycle, when all three are present.
    pub fn cycle_scope(&self) -> Option<(&str, &str, &str)> {
        let (workspace, project) = self.project_scope()?;
        Some((workspace, project, self.cycle_id.as_deref()?))
    }

    pub fn page_path(&self) -> Option<String> {
        self.cycle_scope()
            .map(|(workspace, project, cycle)| cycle_page_path(workspace, project, cycle))
    }
}

pub fn cycle_page_path(workspace_slug: &str, project_id: &str, cycle_id: &str) -> String {
    format!("/{workspace_slug}/projects/{project_id}/cycles/{cycle_id}")
}

/// Sign-in location that returns to `original_path` after login.
pub fn sign_in_redirect(original_path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", original_path)
        .finish();
    format!("{SIGN_IN_PATH}?{query}")
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

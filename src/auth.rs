//! Access gate run before the cycle page is built.

use serde::Serialize;

use crate::error::Result;
use crate::route::{sign_in_redirect, RouteParams};
use crate::services::AuthService;
use crate::types::MemberRole;

/// Role of the requester in the project, one flag per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleFlags {
    pub is_owner: bool,
    pub is_member: bool,
    pub is_viewer: bool,
    pub is_guest: bool,
}

impl RoleFlags {
    /// Missing membership or an unknown code leaves every flag false.
    pub fn from_role(code: Option<i32>) -> Self {
        let role = code.and_then(MemberRole::from_code);
        Self {
            is_owner: role == Some(MemberRole::Owner),
            is_member: role == Some(MemberRole::Member),
            is_viewer: role == Some(MemberRole::Viewer),
            is_guest: role == Some(MemberRole::Guest),
        }
    }

    /// Owners and members may change the cycle.
    pub fn can_edit(&self) -> bool {
        self.is_owner || self.is_member
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Redirect { location: String },
    Render(RoleFlags),
}

pub struct AccessGate;

impl AccessGate {
    /// No session → redirect to sign-in with `next` set to `requested_path`.
    /// Otherwise the membership lookup decides the flags; a lookup that fails
    /// or finds nothing degrades to all-false rather than blocking the page.
    pub async fn check<A: AuthService + ?Sized>(
        auth: &A,
        cookie: &str,
        params: &RouteParams,
        requested_path: &str,
    ) -> Result<GateOutcome> {
        let Some(user) = auth.require_session(cookie).await? else {
            tracing::info!(path = requested_path, "no session, redirecting to sign in");
            return Ok(GateOutcome::Redirect {
                location: sign_in_redirect(requested_path),
            });
        };

        let Some((workspace, project)) = params.project_scope() else {
            return Ok(GateOutcome::Render(RoleFlags::default()));
        };

        let role = match auth.require_project_role(workspace, project, cookie).await {
            Ok(Some(membership)) => Some(membership.role),
            Ok(None) => {
                tracing::warn!(user = %user.id, workspace, project, "no project membership");
                None
            }
            Err(e) => {
                tracing::warn!(user = %user.id, workspace, project, error = %e, "role lookup failed");
                None
            }
        };

        Ok(GateOutcome::Render(RoleFlags::from_role(role)))
    }
}

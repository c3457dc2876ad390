use serde::{Deserialize, Serialize};

/// Project membership record of the requesting user.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProjectMembership {
    #[serde(default)]
    pub id: Option<String>,
    pub role: i32,
}

/// Project roles, keyed by their numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Owner = 20,
    Member = 15,
    Viewer = 10,
    Guest = 5,
}

impl MemberRole {
    /// Exact match on the role code; anything else has no role.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            20 => Some(MemberRole::Owner),
            15 => Some(MemberRole::Member),
            10 => Some(MemberRole::Viewer),
            5 => Some(MemberRole::Guest),
            _ => None,
        }
    }
}

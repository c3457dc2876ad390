mod cycle;
mod issue;
mod member;
mod priority;
mod project;
mod user;

pub use cycle::{Cycle, CycleDetails, CycleIssueAssociation};
pub use issue::{Issue, IssueDraft, IssueList, IssuePatch};
#[cfg(test)]
pub use issue::{IssueCycleRef, IssueState};
pub use member::{MemberRole, ProjectMembership};
pub use priority::Priority;
pub use project::ProjectDetails;
pub use user::User;

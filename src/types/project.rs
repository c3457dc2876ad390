use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProjectDetails {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub identifier: Option<String>,
}

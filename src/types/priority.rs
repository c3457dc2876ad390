use std::fmt;

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Priority levels for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Urgent priority
    Urgent,
    /// High priority
    High,
    /// Medium priority
    Medium,
    /// Low priority
    Low,
    /// No priority
    None,
}

impl Priority {
    /// Get the label for this priority.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::None => "None",
        }
    }

    /// Get the colored label for terminal output.
    pub fn colored(self) -> String {
        let label = self.label();
        match self {
            Priority::None => label.to_string(),
            Priority::Urgent => label.red().bold().to_string(),
            Priority::High => label.yellow().bold().to_string(),
            Priority::Medium => label.blue().to_string(),
            Priority::Low => label.bright_black().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

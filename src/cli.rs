use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::types::Priority;
use crate::view::GroupBy;

#[derive(Parser)]
#[command(name = "plane")]
#[command(about = "A CLI for Plane cycles", version)]
#[command(after_help = "EXAMPLES:
    plane cycle view acme/projects/<project>/cycles/<cycle>     Show a cycle
    plane cycle available <PAGE>                                Issues that can be added
    plane cycle add <PAGE> <ISSUE_ID> <ISSUE_ID>                Add issues to a cycle
    plane cycle create <PAGE> -t \"Title\"                        Create an issue in a cycle
    plane cycle edit <PAGE> <ISSUE_ID> --priority high          Update an issue")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show detailed error information and info-level logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with a cycle page
    #[command(after_help = "EXAMPLES:
    plane cycle view /acme/projects/<project>/cycles/<cycle>
    plane cycle view https://app.plane.so/acme/projects/<project>/cycles/<cycle> --group-by priority
    plane cycle add <PAGE> <ISSUE_ID>")]
    Cycle {
        #[command(subcommand)]
        action: CycleCommands,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    plane completions bash > ~/.bash_completion.d/plane
    plane completions zsh > ~/.zfunc/_plane
    plane completions fish > ~/.config/fish/completions/plane.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    plane init")]
    Init,
}

#[derive(Subcommand)]
pub enum CycleCommands {
    /// Show the cycle page: side panel and its issues
    #[command(alias = "v")]
    View(CycleViewArgs),
    /// List sibling cycles of the project
    #[command(alias = "ls")]
    List {
        /// Cycle page path or URL
        page: String,
    },
    /// List project issues that are not in any cycle yet
    Available {
        /// Cycle page path or URL
        page: String,
    },
    /// Add existing issues to the cycle
    Add(CycleAddArgs),
    /// Create a new issue inside the cycle
    #[command(alias = "c")]
    Create(CycleCreateArgs),
    /// Update an issue shown on the cycle page
    #[command(alias = "e")]
    Edit(CycleEditArgs),
}

#[derive(Args)]
pub struct CycleViewArgs {
    /// Cycle page path or URL
    pub page: String,

    /// Filter by state name
    #[arg(long)]
    pub state: Option<String>,

    /// Filter by priority
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// Group issues
    #[arg(long, value_enum, default_value = "state")]
    pub group_by: GroupBy,

    /// Collapse the side panel
    #[arg(long)]
    pub collapse: bool,
}

#[derive(Args)]
pub struct CycleAddArgs {
    /// Cycle page path or URL
    pub page: String,

    /// Issue IDs to add
    #[arg(required = true)]
    pub issues: Vec<String>,
}

#[derive(Args)]
pub struct CycleCreateArgs {
    /// Cycle page path or URL
    pub page: String,

    /// Issue title
    #[arg(long, short)]
    pub title: String,

    /// Issue description
    #[arg(long, short)]
    pub description: Option<String>,

    /// Priority
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// State ID to create the issue in
    #[arg(long)]
    pub state: Option<String>,
}

#[derive(Args)]
pub struct CycleEditArgs {
    /// Cycle page path or URL
    pub page: String,

    /// Issue ID to update
    pub issue: String,

    /// New title
    #[arg(long, short)]
    pub title: Option<String>,

    /// New description
    #[arg(long, short)]
    pub description: Option<String>,

    /// New priority
    #[arg(long, value_enum)]
    pub priority: Option<Priority>,

    /// New state ID
    #[arg(long)]
    pub state: Option<String>,
}

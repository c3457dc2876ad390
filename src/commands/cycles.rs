use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::auth::RoleFlags;
use crate::cache::FetchCache;
use crate::cli::{CycleAddArgs, CycleCreateArgs, CycleEditArgs, CycleViewArgs};
use crate::client::PlaneClient;
use crate::config::Config;
use crate::error::{PlaneError, Result};
use crate::output::{self, format_window, status_colored, truncate};
use crate::page::{CycleLink, CyclePage, PageOpen};
use crate::route::RouteParams;
use crate::state::ActionType;
use crate::types::{CycleDetails, Issue, IssueDraft, IssuePatch};
use crate::view::{group_issues, DerivedCycleIssue, GroupBy, IssueFilter, RenderState};

#[derive(Tabled)]
struct IssueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Sub-issues")]
    sub_issues: u32,
}

impl IssueRow {
    fn new(issue: &Issue, project_identifier: Option<&str>) -> Self {
        let state = issue.state_detail.as_ref();
        Self {
            id: issue_label(issue, project_identifier),
            title: truncate(&issue.title, 50),
            state: status_colored(
                issue.state_name(),
                state.and_then(|s| s.color.as_deref()),
                state.and_then(|s| s.group.as_deref()),
            ),
            priority: issue.priority.map(|p| p.colored()).unwrap_or_default(),
            sub_issues: issue.sub_issues_count.unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AvailableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Ref")]
    reference: String,
    #[tabled(rename = "Title")]
    title: String,
}

#[derive(Tabled)]
struct CycleLinkRow {
    #[tabled(rename = "")]
    current: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Page")]
    path: String,
}

impl From<&CycleLink> for CycleLinkRow {
    fn from(link: &CycleLink) -> Self {
        Self {
            current: if link.current { "*" } else { "" },
            name: link.name.clone(),
            path: link.path.clone(),
        }
    }
}

#[derive(Serialize)]
struct PageJson<'a> {
    breadcrumbs: Vec<String>,
    roles: RoleFlags,
    cycle: Option<&'a CycleDetails>,
    side_panel_collapsed: bool,
    state: &'static str,
    issues: Option<Vec<&'a DerivedCycleIssue>>,
}

fn issue_label(issue: &Issue, project_identifier: Option<&str>) -> String {
    match (project_identifier, issue.sequence_id) {
        (Some(identifier), Some(sequence)) => format!("{identifier}-{sequence}"),
        _ => issue.id.clone(),
    }
}

async fn open_page(config: &Config, page: &str) -> Result<CyclePage<PlaneClient>> {
    let params = RouteParams::parse_complete(page)?;
    let requested_path = params.page_path().unwrap_or_default();
    let cookie = config.cookie()?;
    let client = PlaneClient::new(config.base_url(), cookie.clone());
    let cache = FetchCache::new(config.revalidate_after());

    match CyclePage::open(client, cache, params, &cookie, &requested_path).await? {
        PageOpen::Ready(mut page) => {
            page.refresh().await;
            Ok(page)
        }
        PageOpen::Redirect(location) => Err(PlaneError::SignInRequired {
            location: format!("{}{location}", config.base_url()),
        }),
    }
}

fn require_edit(page: &CyclePage<PlaneClient>, action: &'static str) -> Result<()> {
    if page.roles().can_edit() {
        Ok(())
    } else {
        Err(PlaneError::ReadOnly(action))
    }
}

pub async fn view(config: &Config, args: CycleViewArgs) -> Result<()> {
    let mut page = open_page(config, &args.page).await?;
    if args.collapse {
        page.toggle_side_panel();
    }

    let filter = IssueFilter {
        state: args.state,
        priority: args.priority,
    };
    let state = page.render_state();

    if output::is_json_output() {
        let (label, issues) = match &state {
            RenderState::Loading => ("loading", None),
            RenderState::Empty => ("empty", Some(Vec::new())),
            RenderState::Populated(issues) => ("populated", Some(filter.apply(issues))),
        };
        output::print_json(&PageJson {
            breadcrumbs: page.breadcrumbs(),
            roles: page.roles(),
            cycle: page.cycle(),
            side_panel_collapsed: page.view.side_panel_collapsed,
            state: label,
            issues,
        });
        return Ok(());
    }

    println!("{}", page.breadcrumbs().join(" / ").bold());
    println!();
    print_side_panel(&page);
    println!();

    match state {
        RenderState::Loading => println!("{}", "Loading cycle issues...".bright_black()),
        RenderState::Empty => print_empty_state(&page),
        RenderState::Populated(issues) => {
            let identifier = page
                .data()
                .project
                .as_ref()
                .and_then(|p| p.identifier.as_deref());
            let matching = filter.apply(&issues);
            if matching.is_empty() {
                println!("No issues match the filter.");
            }
            for (group, members) in group_issues(&matching, args.group_by) {
                if args.group_by != GroupBy::None {
                    println!("{} ({})", group.bold(), members.len());
                }
                let rows = members.iter().map(|d| IssueRow::new(&d.issue, identifier));
                println!("{}", output::table(rows));
            }
        }
    }

    Ok(())
}

fn print_side_panel(page: &CyclePage<PlaneClient>) {
    let Some(cycle) = page.cycle() else {
        println!("{}", "Loading cycle details...".bright_black());
        return;
    };

    if page.view.side_panel_collapsed {
        println!("{} {}", "▸".bright_black(), cycle.name.bold());
        return;
    }

    println!("{} {}", "▾".bright_black(), cycle.name.bold());
    println!(
        "  Dates:    {}",
        format_window(cycle.start_date.as_deref(), cycle.end_date.as_deref())
    );
    if let Some(owner) = &cycle.owned_by {
        println!("  Owner:    {}", owner.label());
    }
    if let Some(total) = cycle.total_issues {
        println!(
            "  Progress: {}/{} done, {} started",
            cycle.completed_issues.unwrap_or_default(),
            total,
            cycle.started_issues.unwrap_or_default()
        );
    }
    if let Some(description) = cycle.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  {description}");
    }
}

fn print_empty_state(page: &CyclePage<PlaneClient>) {
    println!("{}", "This cycle has no issues yet.".bold());
    if !page.roles().can_edit() {
        return;
    }
    let path = page.params().page_path().unwrap_or_default();
    println!("  Create a new issue:     plane cycle create {path} -t <TITLE>");
    println!("  Add an existing issue:  plane cycle available {path}");
}

pub async fn list(config: &Config, page: &str) -> Result<()> {
    let page = open_page(config, page).await?;
    let links = page.cycle_switcher();
    output::print_table(&links, |link| CycleLinkRow::from(link));
    Ok(())
}

pub async fn available(config: &Config, page: &str) -> Result<()> {
    let mut page = open_page(config, page).await?;
    page.open_issues_list_modal();

    let identifier = page
        .data()
        .project
        .as_ref()
        .and_then(|p| p.identifier.clone());
    let issues = page.available_issues();

    if issues.is_empty() && !output::is_json_output() {
        output::print_message("No issues available to add.");
        return Ok(());
    }

    output::print_table(&issues, |issue| AvailableRow {
        id: issue.id.clone(),
        reference: issue_label(issue, identifier.as_deref()),
        title: truncate(&issue.title, 60),
    });
    Ok(())
}

pub async fn add(config: &Config, args: CycleAddArgs) -> Result<()> {
    let mut page = open_page(config, &args.page).await?;
    require_edit(&page, "adding issues")?;

    page.open_issues_list_modal();
    let count = args.issues.len();
    if let Err(e) = page.submit_issues(args.issues).await {
        if let Some(banner) = page.view.take_banner() {
            eprintln!("{}", banner.yellow());
        }
        return Err(e);
    }

    page.refresh().await;
    let total = page.data().cycle_issues.as_ref().map(Vec::len);
    let name = page.cycle().map(|c| c.name.clone()).unwrap_or_default();
    match total {
        Some(total) => output::print_message(&format!(
            "Added {count} issue(s) to {name} ({total} in cycle)"
        )),
        None => output::print_message(&format!("Added {count} issue(s) to {name}")),
    }
    Ok(())
}

pub async fn create(config: &Config, args: CycleCreateArgs) -> Result<()> {
    let mut page = open_page(config, &args.page).await?;
    require_edit(&page, "creating issues")?;

    match args.state {
        Some(state) => page.view.open_create_issue_with(serde_json::Map::from_iter([(
            "state".to_string(),
            serde_json::Value::String(state),
        )])),
        None => page.open_create_issue_modal(None, ActionType::Create),
    }

    let draft = IssueDraft {
        name: args.title,
        description: args.description,
        priority: args.priority,
        state: None,
    };
    let issue = match page.create_issue(draft).await {
        Ok(issue) => issue,
        Err(e) => {
            if let Some(banner) = page.view.take_banner() {
                eprintln!("{}", banner.yellow());
            }
            return Err(e);
        }
    };

    let identifier = page
        .data()
        .project
        .as_ref()
        .and_then(|p| p.identifier.as_deref());
    output::print_message(&format!(
        "Created {} - {}",
        issue_label(&issue, identifier),
        issue.title
    ));
    Ok(())
}

pub async fn edit(config: &Config, args: CycleEditArgs) -> Result<()> {
    let mut page = open_page(config, &args.page).await?;
    require_edit(&page, "editing issues")?;

    let issue = page
        .find_issue(&args.issue)
        .ok_or_else(|| PlaneError::IssueNotFound(args.issue.clone()))?;
    page.open_create_issue_modal(Some(issue), ActionType::Edit);

    let patch = IssuePatch {
        name: args.title,
        description: args.description,
        priority: args.priority,
        state: args.state,
    };
    let issue = match page.update_issue(patch).await {
        Ok(issue) => issue,
        Err(e) => {
            if let Some(banner) = page.view.take_banner() {
                eprintln!("{}", banner.yellow());
            }
            return Err(e);
        }
    };

    let identifier = page
        .data()
        .project
        .as_ref()
        .and_then(|p| p.identifier.as_deref());
    output::print_message(&format!(
        "Updated {} - {}",
        issue_label(&issue, identifier),
        issue.title
    ));
    Ok(())
}

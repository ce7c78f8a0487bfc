//! List command implementation.
//!
//! Builds a `FilterRequest` from the CLI flags and renders the evaluated
//! result as text or JSON.

use crate::cli::ListArgs;
use crate::config::{CliOverrides, TrackerConfig};
use crate::error::{Result, TrackerError};
use crate::model::{Issue, Priority};
use crate::query::{FilterRequest, Scope, SortField, StatusFilter};
use crate::tracker::Tracker;
use crate::util::time::parse_cutoff;

use super::{open_workspace, resolve_tag};

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the workspace is missing or a filter flag doesn't
/// parse. Query evaluation itself never fails outward.
pub fn execute(args: &ListArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (tracker, cfg) = open_workspace(cli)?;

    let request = build_request(args, &tracker, &cfg)?;

    if args.count {
        let count = tracker.count_matching(&request);
        if json {
            println!("{}", serde_json::json!({ "count": count }));
        } else {
            println!("{count}");
        }
        return Ok(());
    }

    let issues = tracker.list_issues(&request);

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("No issues found.");
    } else {
        for issue in &issues {
            println!("{}", format_issue_line(issue));
        }
        println!("\n{} issue(s)", issues.len());
    }

    Ok(())
}

/// Convert CLI flags into a filter request.
fn build_request(args: &ListArgs, tracker: &Tracker, cfg: &TrackerConfig) -> Result<FilterRequest> {
    let scope = if let Some(reference) = &args.tag {
        Scope::Tag {
            tag_id: resolve_tag(tracker, reference)?.id,
        }
    } else if let Some(raw) = &args.since {
        let cutoff = parse_cutoff(raw).ok_or_else(|| {
            TrackerError::validation(
                "since",
                format!("invalid cutoff '{raw}' (try: 7d, 24h, or 2026-01-15)"),
            )
        })?;
        Scope::Smart { cutoff }
    } else if args.recent {
        Scope::recent(cfg.recent_window_days)
    } else {
        Scope::all()
    };

    let tokens = args
        .tokens
        .iter()
        .map(|reference| resolve_tag(tracker, reference).map(|tag| tag.id))
        .collect::<Result<Vec<_>>>()?;

    let priority = args
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let status = args
        .status
        .as_deref()
        .map(str::parse::<StatusFilter>)
        .transpose()?
        .unwrap_or_default();

    Ok(FilterRequest {
        scope,
        search: args.search.clone().unwrap_or_default(),
        tokens,
        filter_enabled: args.priority.is_some() || args.status.is_some(),
        priority,
        status,
        sort: args
            .sort
            .as_deref()
            .map(str::parse::<SortField>)
            .transpose()?
            .unwrap_or_default(),
        newest_first: !args.oldest_first,
    })
}

fn format_issue_line(issue: &Issue) -> String {
    let closed = if issue.completed { "  [CLOSED]" } else { "" };
    format!(
        "{}  [{}] {}{} (modified {})",
        issue.id,
        issue.priority,
        issue.title,
        closed,
        issue.modified_at.format("%Y-%m-%d")
    )
}

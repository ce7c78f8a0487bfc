use crate::cli::UpdateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Priority;
use crate::storage::IssueUpdate;

use super::{open_workspace, resolve_tag};

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the issue or a referenced tag is unknown, or the
/// write fails.
pub fn execute(args: &UpdateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut tracker, _cfg) = open_workspace(cli)?;

    let completed = if args.close {
        Some(true)
    } else if args.reopen {
        Some(false)
    } else {
        None
    };

    let updates = IssueUpdate {
        title: args.title.clone(),
        // An explicitly empty string clears the description
        content: args
            .content
            .clone()
            .map(|text| if text.is_empty() { None } else { Some(text) }),
        priority: args
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        completed,
    };

    let mut issue = tracker.update_issue(&args.id, &updates)?;

    if let Some(reference) = &args.add_tag {
        let tag = resolve_tag(&tracker, reference)?;
        tracker.add_tag_to_issue(&args.id, &tag.id)?;
    }
    if let Some(reference) = &args.remove_tag {
        let tag = resolve_tag(&tracker, reference)?;
        tracker.remove_tag_from_issue(&args.id, &tag.id)?;
    }
    if args.add_tag.is_some() || args.remove_tag.is_some() {
        if let Some(reloaded) = tracker.store().get_issue(&args.id)? {
            issue = reloaded;
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        println!("Updated {}: {} [{}]", issue.id, issue.title, issue.status_label());
    }

    Ok(())
}

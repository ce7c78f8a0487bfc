use crate::cli::CreateArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Priority;
use crate::storage::IssueUpdate;

use super::{open_workspace, resolve_tag};

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the workspace is missing, the tag is unknown, or
/// the write fails.
pub fn execute(args: &CreateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut tracker, _cfg) = open_workspace(cli)?;

    let attach = match &args.tag {
        Some(reference) => Some(resolve_tag(&tracker, reference)?.id),
        None => None,
    };

    let mut issue = tracker.new_issue(attach.as_deref())?;

    let updates = IssueUpdate {
        title: args.title.clone(),
        content: args.content.clone().map(Some),
        priority: args
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        completed: None,
    };
    if !updates.is_empty() {
        issue = tracker.update_issue(&issue.id, &updates)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        println!("Created {}: {}", issue.id, issue.title);
    }

    Ok(())
}

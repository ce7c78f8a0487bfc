use crate::cli::CountArgs;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::EntityKind;
use serde::Serialize;

use super::open_workspace;

#[derive(Serialize)]
struct CountOutput {
    count: usize,
}

#[derive(Serialize)]
struct CountBothOutput {
    tags: usize,
    issues: usize,
}

/// Execute the count command.
///
/// # Errors
///
/// Returns an error if the workspace is missing or the kind doesn't
/// parse.
pub fn execute(args: &CountArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (tracker, _cfg) = open_workspace(cli)?;

    match &args.kind {
        Some(kind) => {
            let count = tracker.count(kind.parse::<EntityKind>()?);
            if json {
                println!("{}", serde_json::to_string(&CountOutput { count })?);
            } else {
                println!("{count}");
            }
        }
        None => {
            let tags = tracker.count(EntityKind::Tag);
            let issues = tracker.count(EntityKind::Issue);
            if json {
                println!("{}", serde_json::to_string(&CountBothOutput { tags, issues })?);
            } else {
                println!("Tags: {tags}");
                println!("Issues: {issues}");
            }
        }
    }

    Ok(())
}

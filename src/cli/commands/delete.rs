use crate::cli::DeleteArgs;
use crate::config::CliOverrides;
use crate::error::{Result, TrackerError};

use super::open_workspace;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the workspace is missing, no target was given, an
/// issue is unknown, or the batch delete fails (store left unchanged).
pub fn execute(args: &DeleteArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut tracker, _cfg) = open_workspace(cli)?;

    if args.all {
        tracker.delete_all()?;
        if !json {
            println!("Deleted all tags and issues.");
        }
        return Ok(());
    }

    if args.ids.is_empty() {
        return Err(TrackerError::validation(
            "ids",
            "provide issue IDs, or --all to clear the store",
        ));
    }

    for issue_id in &args.ids {
        tracker.delete_issue(issue_id)?;
        if !json {
            println!("Deleted {issue_id}");
        }
    }

    Ok(())
}

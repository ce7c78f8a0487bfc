use crate::cli::SampleArgs;
use crate::config::CliOverrides;
use crate::error::Result;

use super::open_workspace;

/// Execute the sample command.
///
/// # Errors
///
/// Returns an error if the workspace is missing or the batch insert
/// fails (rolled back as a whole).
pub fn execute(args: &SampleArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut tracker, _cfg) = open_workspace(cli)?;

    tracker.create_sample_data(args.tags, args.issues)?;

    if !json {
        println!(
            "Created {} tags with {} issues each.",
            args.tags, args.issues
        );
    }

    Ok(())
}

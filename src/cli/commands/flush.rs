use crate::config::CliOverrides;
use crate::error::Result;

use super::open_workspace;

/// Execute the flush command: an explicit, immediate save.
///
/// # Errors
///
/// Returns an error if the workspace is missing. A failed snapshot write
/// is not an error here; it is logged and the changes stay retained.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut tracker, _cfg) = open_workspace(cli)?;

    let wrote = tracker.save();

    if !json {
        if wrote {
            println!("Snapshot written.");
        } else {
            println!("Nothing to flush.");
        }
    }

    Ok(())
}

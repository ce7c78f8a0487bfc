use crate::config::CliOverrides;
use crate::error::Result;

use super::open_workspace;

/// Execute the suggest command.
///
/// # Errors
///
/// Returns an error if the workspace is missing.
pub fn execute(text: &str, json: bool, cli: &CliOverrides) -> Result<()> {
    let (tracker, _cfg) = open_workspace(cli)?;

    let tags = tracker.suggest_tags(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else if tags.is_empty() {
        println!("No suggestions.");
    } else {
        for tag in &tags {
            println!("{}  {}", tag.id, tag.display_name());
        }
    }

    Ok(())
}

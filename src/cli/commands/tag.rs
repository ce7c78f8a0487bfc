use crate::cli::TagCommands;
use crate::config::CliOverrides;
use crate::error::Result;
use crate::model::Tag;

use super::{open_workspace, resolve_tag};

/// Execute a tag subcommand.
///
/// # Errors
///
/// Returns an error if the workspace is missing, a referenced tag is
/// unknown, or a write fails.
pub fn execute(command: &TagCommands, json: bool, cli: &CliOverrides) -> Result<()> {
    let (mut tracker, _cfg) = open_workspace(cli)?;

    match command {
        TagCommands::Add { name } => {
            let tag = tracker.new_tag(name.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tag)?);
            } else {
                println!("Created {}: {}", tag.id, tag.display_name());
            }
        }
        TagCommands::Rename { id, name } => {
            let tag = resolve_tag(&tracker, id)?;
            let tag = tracker.rename_tag(&tag.id, name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tag)?);
            } else {
                println!("Renamed {} to {}", tag.id, tag.display_name());
            }
        }
        TagCommands::Delete { id } => {
            let tag = resolve_tag(&tracker, id)?;
            tracker.delete_tag(&tag.id)?;
            if !json {
                println!("Deleted {}", tag.id);
            }
        }
        TagCommands::List => {
            let tags = tracker.store().list_tags()?;
            print_tags(&tags, json)?;
        }
        TagCommands::Missing { issue_id } => {
            let tags = tracker.missing_tags(issue_id);
            print_tags(&tags, json)?;
        }
    }

    Ok(())
}

fn print_tags(tags: &[Tag], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tags)?);
    } else if tags.is_empty() {
        println!("No tags.");
    } else {
        for tag in tags {
            println!("{}  {}", tag.id, tag.display_name());
        }
    }
    Ok(())
}

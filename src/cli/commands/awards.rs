use crate::awards::Award;
use crate::config::CliOverrides;
use crate::error::Result;
use serde::Serialize;

use super::open_workspace;

#[derive(Serialize)]
struct AwardStatus<'a> {
    #[serde(flatten)]
    award: &'a Award,
    earned: bool,
}

/// Execute the awards command.
///
/// # Errors
///
/// Returns an error if the workspace is missing.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    let (tracker, _cfg) = open_workspace(cli)?;

    let statuses: Vec<AwardStatus<'_>> = tracker
        .awards()
        .iter()
        .map(|award| AwardStatus {
            award,
            earned: tracker.has_earned(award),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
    } else {
        for status in &statuses {
            let mark = if status.earned { "x" } else { " " };
            println!(
                "[{mark}] {} - {}",
                status.award.name, status.award.description
            );
        }
        let earned = statuses.iter().filter(|status| status.earned).count();
        println!("\n{earned}/{} awards earned", statuses.len());
    }

    Ok(())
}

use crate::error::{Result, TrackerError};
use crate::storage::TrackerStore;
use std::fs;
use std::path::Path;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the directory or database cannot be created.
pub fn execute(force: bool, root_dir: Option<&Path>) -> Result<()> {
    let base_dir = root_dir.unwrap_or_else(|| Path::new("."));
    let tracker_dir = base_dir.join(".tracker");

    if tracker_dir.exists() {
        let db_path = tracker_dir.join("tracker.db");
        if db_path.exists() && !force {
            return Err(TrackerError::AlreadyInitialized { path: db_path });
        }
    } else {
        fs::create_dir(&tracker_dir)?;
    }

    let db_path = tracker_dir.join("tracker.db");

    // Initialize DB (creates file and applies schema)
    let _store = TrackerStore::open(&db_path)?;

    // Write metadata.json
    let metadata_path = tracker_dir.join("metadata.json");
    if !metadata_path.exists() || force {
        let metadata = r#"{
  "database": "tracker.db",
  "snapshot": "snapshot.jsonl"
}"#;
        fs::write(metadata_path, metadata)?;
    }

    // Write config.yaml template
    let config_path = tracker_dir.join("config.yaml");
    if !config_path.exists() {
        let config = r"# Tracker Project Configuration
# save_delay_seconds: 3
# recent_window_days: 7
";
        fs::write(config_path, config)?;
    }

    // Write .gitignore: the DB is local, the snapshot is the synced artifact
    let gitignore_path = tracker_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let gitignore = r"# Database
*.db
*.db-shm
*.db-wal

# Temporary
*.tmp
";
        fs::write(gitignore_path, gitignore)?;
    }

    println!("Initialized tracker workspace in .tracker/");
    Ok(())
}

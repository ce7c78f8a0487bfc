//! Configuration management for `tracker_rust`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`TRK_DB`)
//! 3. Project config (.tracker/config.yaml)
//! 4. Defaults

use crate::error::{Result, TrackerError};
use crate::tracker::Tracker;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Workspace directory name discovered by upward walk.
pub const TRACKER_DIR: &str = ".tracker";
/// Default database filename used when metadata is missing.
const DEFAULT_DB_FILENAME: &str = "tracker.db";
/// Default snapshot filename used when metadata is missing.
const DEFAULT_SNAPSHOT_FILENAME: &str = "snapshot.jsonl";

/// Startup metadata describing DB + snapshot paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub database: String,
    pub snapshot: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            database: DEFAULT_DB_FILENAME.to_string(),
            snapshot: DEFAULT_SNAPSHOT_FILENAME.to_string(),
        }
    }
}

impl Metadata {
    /// Load metadata.json from the tracker directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(tracker_dir: &Path) -> Result<Self> {
        let path = tracker_dir.join("metadata.json");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let mut metadata: Self = serde_json::from_str(&contents)?;

        if metadata.database.trim().is_empty() {
            metadata.database = DEFAULT_DB_FILENAME.to_string();
        }
        if metadata.snapshot.trim().is_empty() {
            metadata.snapshot = DEFAULT_SNAPSHOT_FILENAME.to_string();
        }

        Ok(metadata)
    }
}

/// Tunables read from .tracker/config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Quiet period between the last edit and the deferred flush.
    pub save_delay_seconds: u64,
    /// Window for the "recent" smart filter.
    pub recent_window_days: i64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            save_delay_seconds: 3,
            recent_window_days: 7,
        }
    }
}

impl TrackerConfig {
    /// Load config.yaml from the tracker directory, falling back to
    /// defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(tracker_dir: &Path) -> Result<Self> {
        let path = tracker_dir.join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    #[must_use]
    pub const fn save_delay(&self) -> Duration {
        Duration::from_secs(self.save_delay_seconds)
    }
}

/// CLI-level overrides threaded into path resolution.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
}

/// Resolved paths for this workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub tracker_dir: PathBuf,
    pub db_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub metadata: Metadata,
}

impl ConfigPaths {
    /// Resolve database + snapshot paths from metadata, environment, and
    /// CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read.
    pub fn resolve(tracker_dir: &Path, overrides: &CliOverrides) -> Result<Self> {
        let metadata = Metadata::load(tracker_dir)?;

        let db_path = overrides.db.clone().map_or_else(
            || {
                env::var_os("TRK_DB").map_or_else(
                    || tracker_dir.join(&metadata.database),
                    PathBuf::from,
                )
            },
            |db| db,
        );
        let snapshot_path = tracker_dir.join(&metadata.snapshot);

        Ok(Self {
            tracker_dir: tracker_dir.to_path_buf(),
            db_path,
            snapshot_path,
            metadata,
        })
    }
}

/// Walk upward from `start` (or the current directory) looking for a
/// `.tracker` workspace.
///
/// # Errors
///
/// Returns [`TrackerError::NotInitialized`] when no workspace is found.
pub fn discover_tracker_dir(start: Option<&Path>) -> Result<PathBuf> {
    let start = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    let mut current = start.as_path();
    loop {
        let candidate = current.join(TRACKER_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Err(TrackerError::NotInitialized),
        }
    }
}

/// Open the tracker for a resolved workspace.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_tracker(paths: &ConfigPaths, config: &TrackerConfig) -> Result<Tracker> {
    Tracker::open(
        &paths.db_path,
        paths.snapshot_path.clone(),
        config.save_delay(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn metadata_defaults_when_file_missing() {
        let temp = TempDir::new().unwrap();
        let metadata = Metadata::load(temp.path()).unwrap();
        assert_eq!(metadata.database, "tracker.db");
        assert_eq!(metadata.snapshot, "snapshot.jsonl");
    }

    #[test]
    fn config_defaults_and_yaml_overrides() {
        let temp = TempDir::new().unwrap();
        let config = TrackerConfig::load(temp.path()).unwrap();
        assert_eq!(config.save_delay(), Duration::from_secs(3));
        assert_eq!(config.recent_window_days, 7);

        fs::write(temp.path().join("config.yaml"), "save_delay_seconds: 10\n").unwrap();
        let config = TrackerConfig::load(temp.path()).unwrap();
        assert_eq!(config.save_delay(), Duration::from_secs(10));
        // Unspecified keys keep their defaults
        assert_eq!(config.recent_window_days, 7);
    }

    #[test]
    fn discover_walks_up_to_the_workspace() {
        let temp = TempDir::new().unwrap();
        let tracker_dir = temp.path().join(TRACKER_DIR);
        fs::create_dir(&tracker_dir).unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = discover_tracker_dir(Some(&nested)).unwrap();
        assert_eq!(found, tracker_dir);
    }

    #[test]
    fn discover_reports_not_initialized() {
        let temp = TempDir::new().unwrap();
        let err = discover_tracker_dir(Some(temp.path())).unwrap_err();
        assert!(matches!(err, TrackerError::NotInitialized));
    }

    #[test]
    fn resolve_honors_cli_override() {
        let temp = TempDir::new().unwrap();
        let overrides = CliOverrides {
            db: Some(PathBuf::from("/elsewhere/custom.db")),
        };
        let paths = ConfigPaths::resolve(temp.path(), &overrides).unwrap();
        assert_eq!(paths.db_path, PathBuf::from("/elsewhere/custom.db"));
        assert_eq!(paths.snapshot_path, temp.path().join("snapshot.jsonl"));
    }
}

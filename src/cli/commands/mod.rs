//! Command implementations.

pub mod awards;
pub mod count;
pub mod create;
pub mod delete;
pub mod flush;
pub mod init;
pub mod list;
pub mod sample;
pub mod suggest;
pub mod tag;
pub mod update;

use crate::config::{self, CliOverrides, ConfigPaths, TrackerConfig};
use crate::error::{Result, TrackerError};
use crate::model::Tag;
use crate::tracker::Tracker;

/// Discover the workspace and open a tracker with its config.
pub(crate) fn open_workspace(cli: &CliOverrides) -> Result<(Tracker, TrackerConfig)> {
    let tracker_dir = config::discover_tracker_dir(None)?;
    let paths = ConfigPaths::resolve(&tracker_dir, cli)?;
    let cfg = TrackerConfig::load(&tracker_dir)?;
    let tracker = config::open_tracker(&paths, &cfg)?;
    Ok((tracker, cfg))
}

/// Resolve a tag reference: tried as an ID first, then as an exact name.
pub(crate) fn resolve_tag(tracker: &Tracker, reference: &str) -> Result<Tag> {
    let store = tracker.store();
    if let Some(tag) = store.get_tag(reference)? {
        return Ok(tag);
    }
    store
        .find_tag_by_name(reference)?
        .ok_or_else(|| TrackerError::TagNotFound {
            id: reference.to_string(),
        })
}

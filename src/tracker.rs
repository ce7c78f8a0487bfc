//! The boundary facade handed to collaborators.
//!
//! `Tracker` owns the entity store and the save coordinator and exposes
//! the full contract: queries, suggestion/difference lists, award checks,
//! mutation entry points, and save control. Reads never fail outward;
//! internal errors degrade to empty results after a warning. Mutations
//! arm the debounced flush; dropping the tracker plays the role of app
//! suspension and flushes immediately.

use crate::awards::{self, Award};
use crate::error::Result;
use crate::model::{EntityKind, Issue, Tag};
use crate::query::{self, FilterRequest};
use crate::storage::{IssueUpdate, SaveCoordinator, TrackerStore};
use crate::sync;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct Tracker {
    store: TrackerStore,
    saver: SaveCoordinator,
    snapshot_path: PathBuf,
}

impl Tracker {
    /// Open a tracker over the database at `db_path`, flushing snapshots
    /// to `snapshot_path` after `save_delay` of quiet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(db_path: &Path, snapshot_path: PathBuf, save_delay: Duration) -> Result<Self> {
        Ok(Self {
            store: TrackerStore::open(db_path)?,
            saver: SaveCoordinator::new(save_delay),
            snapshot_path,
        })
    }

    /// In-memory tracker for tests and previews.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_memory(snapshot_path: PathBuf, save_delay: Duration) -> Result<Self> {
        Ok(Self {
            store: TrackerStore::open_memory()?,
            saver: SaveCoordinator::new(save_delay),
            snapshot_path,
        })
    }

    #[must_use]
    pub const fn store(&self) -> &TrackerStore {
        &self.store
    }

    // === Reads (never fail outward) ===

    /// Evaluate a filter request. Errors degrade to an empty list.
    #[must_use]
    pub fn list_issues(&self, request: &FilterRequest) -> Vec<Issue> {
        query::list_issues(&self.store, request).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "list_issues failed; returning empty");
            vec![]
        })
    }

    /// Tag suggestions for raw filter text. Errors degrade to empty.
    #[must_use]
    pub fn suggest_tags(&self, raw: &str) -> Vec<Tag> {
        query::suggest_tags(&self.store, raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "suggest_tags failed; returning empty");
            vec![]
        })
    }

    /// Tags not yet attached to the issue. Errors degrade to empty.
    #[must_use]
    pub fn missing_tags(&self, issue_id: &str) -> Vec<Tag> {
        query::missing_tags(&self.store, issue_id).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "missing_tags failed; returning empty");
            vec![]
        })
    }

    /// Whether the award's threshold is met right now.
    #[must_use]
    pub fn has_earned(&self, award: &Award) -> bool {
        awards::has_earned(&self.store, award)
    }

    /// The static award catalog.
    #[must_use]
    pub fn awards(&self) -> &'static [Award] {
        awards::all_awards()
    }

    /// Entity count. Errors degrade to zero.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.store.count(kind).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "count failed; returning 0");
            0
        })
    }

    /// Count the issues a filter request matches. Errors degrade to zero.
    #[must_use]
    pub fn count_matching(&self, request: &FilterRequest) -> usize {
        query::count_issues(&self.store, request).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "count_matching failed; returning 0");
            0
        })
    }

    // === Mutations ===

    /// Create a tag and schedule a coalesced save.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn new_tag(&mut self, name: Option<&str>) -> Result<Tag> {
        let tag = self.store.create_tag(name)?;
        self.record_mutation();
        Ok(tag)
    }

    /// Create an issue, optionally attached to the active tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails or the tag is unknown.
    pub fn new_issue(&mut self, attach_to: Option<&str>) -> Result<Issue> {
        let issue = self.store.create_issue(attach_to)?;
        self.record_mutation();
        Ok(issue)
    }

    /// Apply a partial issue edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue is unknown or the write fails.
    pub fn update_issue(&mut self, issue_id: &str, updates: &IssueUpdate) -> Result<Issue> {
        let issue = self.store.update_issue(issue_id, updates)?;
        self.record_mutation();
        Ok(issue)
    }

    /// Rename a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is unknown or the write fails.
    pub fn rename_tag(&mut self, tag_id: &str, name: &str) -> Result<Tag> {
        let tag = self.store.rename_tag(tag_id, name)?;
        self.record_mutation();
        Ok(tag)
    }

    /// Attach a tag to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is unknown.
    pub fn add_tag_to_issue(&mut self, issue_id: &str, tag_id: &str) -> Result<()> {
        self.store.add_tag_to_issue(issue_id, tag_id)?;
        self.record_mutation();
        Ok(())
    }

    /// Detach a tag from an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is unknown.
    pub fn remove_tag_from_issue(&mut self, issue_id: &str, tag_id: &str) -> Result<()> {
        self.store.remove_tag_from_issue(issue_id, tag_id)?;
        self.record_mutation();
        Ok(())
    }

    /// Delete a tag; its issues survive.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is unknown.
    pub fn delete_tag(&mut self, tag_id: &str) -> Result<()> {
        self.store.delete_tag(tag_id)?;
        self.record_mutation();
        Ok(())
    }

    /// Delete an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the issue is unknown.
    pub fn delete_issue(&mut self, issue_id: &str) -> Result<()> {
        self.store.delete_issue(issue_id)?;
        self.record_mutation();
        Ok(())
    }

    /// Delete everything, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch fails (store left unchanged).
    pub fn delete_all(&mut self) -> Result<()> {
        self.store.delete_all()?;
        self.record_mutation();
        Ok(())
    }

    /// Populate sample tags and issues.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails (rolled back as one batch).
    pub fn create_sample_data(&mut self, tag_count: usize, issues_per_tag: usize) -> Result<()> {
        self.store.create_sample_data(tag_count, issues_per_tag)?;
        self.record_mutation();
        Ok(())
    }

    // === Save coordination ===

    /// Arm (or re-arm) the debounced flush. Rapid calls coalesce into a
    /// single pending deadline.
    pub fn record_mutation(&mut self) {
        self.saver.record_mutation(Instant::now());
    }

    /// Fire the pending flush if its deadline has passed. Returns whether
    /// a snapshot write actually happened.
    pub fn poll_save(&mut self) -> bool {
        if self.saver.take_due(Instant::now()) {
            return self.flush_to_snapshot();
        }
        false
    }

    /// Immediate flush: cancels any pending deadline and writes the
    /// snapshot if the store is dirty. Idempotent; a clean store is a
    /// no-op. Returns whether a write happened.
    pub fn save(&mut self) -> bool {
        self.saver.cancel();
        self.flush_to_snapshot()
    }

    /// The remote replica changed. Refresh the store from the snapshot;
    /// merge logic lives in the replication layer, not here. A failed
    /// refresh leaves the local store authoritative.
    pub fn on_remote_change(&mut self) {
        if let Err(err) = sync::import_snapshot(&mut self.store, &self.snapshot_path) {
            tracing::warn!(error = %err, "snapshot refresh failed; keeping local state");
        }
    }

    fn flush_to_snapshot(&mut self) -> bool {
        match self.store.is_dirty() {
            Ok(false) => return false,
            Ok(true) => {}
            Err(err) => {
                // Unreadable flag: flushing a clean store is harmless,
                // skipping a dirty one is not
                tracing::warn!(error = %err, "dirty flag unreadable; flushing anyway");
            }
        }

        match sync::export_snapshot(&self.store, &self.snapshot_path) {
            Ok(()) => {
                if let Err(err) = self.store.clear_dirty() {
                    tracing::warn!(error = %err, "flushed but could not clear dirty flag");
                }
                true
            }
            Err(err) => {
                // Store stays authoritative, dirty flag stays set, a
                // later flush retries
                tracing::warn!(error = %err, "snapshot flush failed; changes retained");
                false
            }
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        // Suspension path: whatever is unsaved goes out now
        self.save();
    }
}

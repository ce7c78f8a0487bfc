//! Replica snapshot export and import.
//!
//! The snapshot is a JSONL file: one tagged record per line, tags first,
//! then issues (each issue line carries its tag-ID list, so the join
//! relation survives the round trip). The file is what the external sync
//! collaborator replicates; this module only reads and writes it locally.
//! Merging concurrent edits is the replication layer's problem, not ours.

use crate::error::{Result, TrackerError};
use crate::model::{Issue, Tag};
use crate::storage::TrackerStore;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One line of the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotRecord {
    Tag(Tag),
    Issue(Issue),
}

/// Export the full store as a snapshot at `path`.
///
/// Atomic: writes to a temp file and renames over the target, so the
/// sync collaborator never observes a half-written snapshot.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the file cannot be
/// written.
pub fn export_snapshot(store: &TrackerStore, path: &Path) -> Result<()> {
    let tags = store.all_tags()?;
    let issues = store.all_issues()?;

    let temp_path = path.with_extension("jsonl.tmp");
    let temp_file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(temp_file);

    for tag in &tags {
        let json = serde_json::to_string(&SnapshotRecord::Tag(tag.clone()))?;
        writeln!(writer, "{json}")?;
    }
    for issue in &issues {
        let json = serde_json::to_string(&SnapshotRecord::Issue(issue.clone()))?;
        writeln!(writer, "{json}")?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| TrackerError::Io(e.into_error()))?
        .sync_all()?;

    fs::rename(&temp_path, path)?;

    tracing::debug!(
        path = %path.display(),
        tags = tags.len(),
        issues = issues.len(),
        "snapshot exported"
    );
    Ok(())
}

/// Read a snapshot file into memory.
///
/// # Errors
///
/// Returns [`TrackerError::SnapshotParse`] naming the offending line when
/// a record doesn't deserialize, or an I/O error if the file can't be
/// read.
pub fn read_snapshot(path: &Path) -> Result<(Vec<Tag>, Vec<Issue>)> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut tags = vec![];
    let mut issues = vec![];

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: SnapshotRecord =
            serde_json::from_str(&line).map_err(|err| TrackerError::SnapshotParse {
                line: index + 1,
                reason: err.to_string(),
            })?;
        match record {
            SnapshotRecord::Tag(tag) => tags.push(tag),
            SnapshotRecord::Issue(issue) => issues.push(issue),
        }
    }

    Ok((tags, issues))
}

/// Replace the store contents with the snapshot at `path`.
///
/// Used when the remote replica changed under us. A missing snapshot is a
/// no-op: there is nothing newer to pick up.
///
/// # Errors
///
/// Returns an error if the snapshot is unreadable or the store swap
/// fails (rolled back, store unchanged).
pub fn import_snapshot(store: &mut TrackerStore, path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no snapshot to import");
        return Ok(());
    }

    let (tags, issues) = read_snapshot(path)?;
    store.replace_all(&tags, &issues)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityKind;
    use tempfile::TempDir;

    #[test]
    fn export_then_import_preserves_entities_and_joins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshot.jsonl");

        let mut store = TrackerStore::open_memory().unwrap();
        let tag = store.create_tag(Some("Home")).unwrap();
        let issue = store.create_issue(Some(&tag.id)).unwrap();
        export_snapshot(&store, &path).unwrap();

        let mut other = TrackerStore::open_memory().unwrap();
        import_snapshot(&mut other, &path).unwrap();

        assert_eq!(other.count(EntityKind::Tag).unwrap(), 1);
        assert_eq!(other.count(EntityKind::Issue).unwrap(), 1);
        let imported = other.get_issue(&issue.id).unwrap().unwrap();
        assert_eq!(imported.tags, vec![tag.id]);
        assert_eq!(imported.title, issue.title);
    }

    #[test]
    fn import_replaces_previous_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshot.jsonl");

        let mut source = TrackerStore::open_memory().unwrap();
        source.create_tag(Some("Only")).unwrap();
        export_snapshot(&source, &path).unwrap();

        let mut target = TrackerStore::open_memory().unwrap();
        target.create_sample_data(3, 3).unwrap();
        import_snapshot(&mut target, &path).unwrap();

        assert_eq!(target.count(EntityKind::Tag).unwrap(), 1);
        assert_eq!(target.count(EntityKind::Issue).unwrap(), 0);
    }

    #[test]
    fn import_missing_snapshot_is_a_noop() {
        let temp = TempDir::new().unwrap();
        let mut store = TrackerStore::open_memory().unwrap();
        store.create_tag(None).unwrap();

        import_snapshot(&mut store, &temp.path().join("absent.jsonl")).unwrap();
        assert_eq!(store.count(EntityKind::Tag).unwrap(), 1);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snapshot.jsonl");
        fs::write(
            &path,
            "{\"kind\":\"tag\",\"id\":\"tag-a\",\"name\":\"ok\"}\nnot json\n",
        )
        .unwrap();

        let err = read_snapshot(&path).unwrap_err();
        match err {
            TrackerError::SnapshotParse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}

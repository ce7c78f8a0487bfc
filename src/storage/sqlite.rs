//! `SQLite` entity store.
//!
//! Owns the canonical Tag and Issue records plus their many-to-many join.
//! Every mutation runs in an immediate transaction and sets the store's
//! dirty flag, which the save coordinator consumes when deciding whether a
//! snapshot flush has work to do.

use crate::error::{Result, TrackerError};
use crate::model::{DEFAULT_TAG_NAME, EntityKind, Issue, Priority, Tag};
use crate::util::id;
use crate::util::time::{format_ts, parse_ts};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Transaction};
use std::path::Path;

use super::schema::apply_schema;

/// SQLite-based entity store.
#[derive(Debug)]
pub struct TrackerStore {
    conn: Connection,
}

impl TrackerStore {
    /// Open a connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    pub(crate) const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Execute a mutation in an immediate transaction, marking the store
    /// dirty in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back
    /// on error, leaving counts and the join relation untouched.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let result = f(&tx)?;
        set_dirty_in_tx(&tx, true)?;
        tx.commit()?;

        tracing::debug!(op, "mutation committed");
        Ok(result)
    }

    // === Tags ===

    /// Create a new tag. A missing name falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_tag(&mut self, name: Option<&str>) -> Result<Tag> {
        let now = Utc::now();
        let name = name.unwrap_or(DEFAULT_TAG_NAME).to_string();

        self.mutate("create_tag", |tx| {
            let tag_id = id::generate(id::TAG_PREFIX, &name, now, |candidate| {
                row_exists(tx, "tags", candidate)
            });
            let tag = Tag { id: tag_id, name };
            insert_tag_in_tx(tx, &tag)?;
            Ok(tag)
        })
    }

    /// Insert a fully-formed tag (snapshot import, tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate ID).
    pub fn insert_tag(&mut self, tag: &Tag) -> Result<()> {
        self.mutate("insert_tag", |tx| insert_tag_in_tx(tx, tag))
    }

    /// Rename a tag.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TagNotFound`] if no tag has the given ID.
    pub fn rename_tag(&mut self, tag_id: &str, name: &str) -> Result<Tag> {
        let updated = self.mutate("rename_tag", |tx| {
            let changed = tx.execute("UPDATE tags SET name = ? WHERE id = ?", [name, tag_id])?;
            Ok(changed)
        })?;

        if updated == 0 {
            return Err(TrackerError::TagNotFound {
                id: tag_id.to_string(),
            });
        }

        Ok(Tag {
            id: tag_id.to_string(),
            name: name.to_string(),
        })
    }

    /// Get a tag by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_tag(&self, tag_id: &str) -> Result<Option<Tag>> {
        let tag = self
            .conn
            .prepare("SELECT id, name FROM tags WHERE id = ?")?
            .query_row([tag_id], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(tag)
    }

    /// Find a tag by exact name. The lowest ID wins when names repeat.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let tag = self
            .conn
            .prepare("SELECT id, name FROM tags WHERE name = ? ORDER BY id LIMIT 1")?
            .query_row([name], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(tag)
    }

    /// List all tags sorted by name (case-insensitive), ties broken by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM tags ORDER BY name COLLATE NOCASE, id")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// Delete a tag, removing its join rows but never its issues.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TagNotFound`] if no tag has the given ID.
    pub fn delete_tag(&mut self, tag_id: &str) -> Result<()> {
        let deleted = self.mutate("delete_tag", |tx| {
            tx.execute("DELETE FROM issue_tags WHERE tag_id = ?", [tag_id])?;
            let deleted = tx.execute("DELETE FROM tags WHERE id = ?", [tag_id])?;
            Ok(deleted)
        })?;

        if deleted == 0 {
            return Err(TrackerError::TagNotFound {
                id: tag_id.to_string(),
            });
        }
        Ok(())
    }

    // === Issues ===

    /// Create a new issue with placeholder title, optionally attached to a
    /// tag (the "currently selected tag" convenience).
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TagNotFound`] if `attach_to` names an
    /// unknown tag.
    pub fn create_issue(&mut self, attach_to: Option<&str>) -> Result<Issue> {
        let now = Utc::now();

        if let Some(tag_id) = attach_to {
            if self.get_tag(tag_id)?.is_none() {
                return Err(TrackerError::TagNotFound {
                    id: tag_id.to_string(),
                });
            }
        }

        self.mutate("create_issue", |tx| {
            let issue_id = id::generate(id::ISSUE_PREFIX, "", now, |candidate| {
                row_exists(tx, "issues", candidate)
            });
            let mut issue = Issue::new(issue_id, now);
            insert_issue_in_tx(tx, &issue)?;

            if let Some(tag_id) = attach_to {
                attach_in_tx(tx, &issue.id, tag_id)?;
                issue.tags.push(tag_id.to_string());
            }

            Ok(issue)
        })
    }

    /// Insert a fully-formed issue and its join rows (snapshot import,
    /// tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or a listed tag is unknown.
    pub fn insert_issue(&mut self, issue: &Issue) -> Result<()> {
        self.mutate("insert_issue", |tx| {
            insert_issue_in_tx(tx, issue)?;
            for tag_id in &issue.tags {
                attach_in_tx(tx, &issue.id, tag_id)?;
            }
            Ok(())
        })
    }

    /// Get an issue by ID, with its tag list populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_issue(&self, issue_id: &str) -> Result<Option<Issue>> {
        let issue = self
            .conn
            .prepare(
                "SELECT id, title, content, created_at, modified_at, completed, priority
                 FROM issues WHERE id = ?",
            )?
            .query_row([issue_id], issue_from_row)
            .optional()?;

        match issue {
            Some(mut issue) => {
                issue.tags = self.tags_for_issue(&issue.id)?;
                Ok(Some(issue))
            }
            None => Ok(None),
        }
    }

    /// Apply a partial update to an issue. Any applied edit advances the
    /// modification timestamp (never backwards) and marks the store dirty.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`] if the issue doesn't exist.
    pub fn update_issue(&mut self, issue_id: &str, updates: &IssueUpdate) -> Result<Issue> {
        let mut issue = self
            .get_issue(issue_id)?
            .ok_or_else(|| TrackerError::IssueNotFound {
                id: issue_id.to_string(),
            })?;

        if updates.is_empty() {
            return Ok(issue);
        }

        if let Some(ref title) = updates.title {
            issue.title.clone_from(title);
        }
        if let Some(ref content) = updates.content {
            issue.content.clone_from(content);
        }
        if let Some(completed) = updates.completed {
            issue.completed = completed;
        }
        if let Some(priority) = updates.priority {
            issue.priority = priority;
        }
        issue.touch(Utc::now());

        self.mutate("update_issue", |tx| {
            tx.execute(
                "UPDATE issues SET title = ?, content = ?, completed = ?, priority = ?,
                 modified_at = ? WHERE id = ?",
                rusqlite::params![
                    issue.title,
                    issue.content.as_deref().unwrap_or(""),
                    i32::from(issue.completed),
                    issue.priority.0,
                    format_ts(issue.modified_at),
                    issue.id,
                ],
            )?;
            Ok(())
        })?;

        Ok(issue)
    }

    /// Attach a tag to an issue. A no-op when already attached.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when either side of the join is unknown.
    pub fn add_tag_to_issue(&mut self, issue_id: &str, tag_id: &str) -> Result<()> {
        self.require_join_ends(issue_id, tag_id)?;
        self.mutate("add_tag_to_issue", |tx| {
            attach_in_tx(tx, issue_id, tag_id)?;
            touch_issue_in_tx(tx, issue_id)
        })
    }

    /// Detach a tag from an issue. A no-op when not attached.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when either side of the join is unknown.
    pub fn remove_tag_from_issue(&mut self, issue_id: &str, tag_id: &str) -> Result<()> {
        self.require_join_ends(issue_id, tag_id)?;
        self.mutate("remove_tag_from_issue", |tx| {
            tx.execute(
                "DELETE FROM issue_tags WHERE issue_id = ? AND tag_id = ?",
                [issue_id, tag_id],
            )?;
            touch_issue_in_tx(tx, issue_id)
        })
    }

    fn require_join_ends(&self, issue_id: &str, tag_id: &str) -> Result<()> {
        if self.get_issue(issue_id)?.is_none() {
            return Err(TrackerError::IssueNotFound {
                id: issue_id.to_string(),
            });
        }
        if self.get_tag(tag_id)?.is_none() {
            return Err(TrackerError::TagNotFound {
                id: tag_id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete an issue and its join rows.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::IssueNotFound`] if no issue has the given ID.
    pub fn delete_issue(&mut self, issue_id: &str) -> Result<()> {
        let deleted = self.mutate("delete_issue", |tx| {
            tx.execute("DELETE FROM issue_tags WHERE issue_id = ?", [issue_id])?;
            let deleted = tx.execute("DELETE FROM issues WHERE id = ?", [issue_id])?;
            Ok(deleted)
        })?;

        if deleted == 0 {
            return Err(TrackerError::IssueNotFound {
                id: issue_id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete every tag, issue, and join row in one transaction. Either
    /// the whole batch is removed or the store is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch delete fails (rolled back).
    pub fn delete_all(&mut self) -> Result<()> {
        self.mutate("delete_all", |tx| {
            tx.execute("DELETE FROM issue_tags", [])?;
            tx.execute("DELETE FROM issues", [])?;
            tx.execute("DELETE FROM tags", [])?;
            Ok(())
        })
    }

    // === Counts ===

    /// Count entities of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count(&self, kind: EntityKind) -> Result<usize> {
        let sql = match kind {
            EntityKind::Tag => "SELECT COUNT(*) FROM tags",
            EntityKind::Issue => "SELECT COUNT(*) FROM issues",
        };
        let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    /// Count completed issues.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_completed_issues(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM issues WHERE completed = 1", [], |row| {
                row.get(0)
            })?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    // === Sample data ===

    /// Populate the store with `tag_count` tags carrying `issues_per_tag`
    /// issues each. Completion and priority follow a fixed pattern so the
    /// generated counts are reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails (rolled back as one batch).
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn create_sample_data(&mut self, tag_count: usize, issues_per_tag: usize) -> Result<()> {
        let now = Utc::now();

        self.mutate("create_sample_data", |tx| {
            for i in 1..=tag_count {
                let name = format!("Tag {i}");
                let tag_id = id::generate(id::TAG_PREFIX, &name, now, |candidate| {
                    row_exists(tx, "tags", candidate)
                });
                insert_tag_in_tx(tx, &Tag { id: tag_id.clone(), name })?;

                for j in 1..=issues_per_tag {
                    let title = format!("Issue {i}-{j}");
                    let issue_id = id::generate(id::ISSUE_PREFIX, &title, now, |candidate| {
                        row_exists(tx, "issues", candidate)
                    });
                    let issue = Issue {
                        id: issue_id,
                        title,
                        content: Some("Description goes here".to_string()),
                        created_at: now,
                        modified_at: now,
                        completed: j % 2 == 0,
                        priority: Priority((j % 3) as i32),
                        tags: vec![],
                    };
                    insert_issue_in_tx(tx, &issue)?;
                    attach_in_tx(tx, &issue.id, &tag_id)?;
                }
            }
            Ok(())
        })
    }

    // === Dirty flag ===

    /// Whether the store holds changes not yet flushed to the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_dirty(&self) -> Result<bool> {
        let value: Option<String> = self
            .conn
            .prepare("SELECT value FROM meta WHERE key = 'dirty'")?
            .query_row([], |row| row.get(0))
            .optional()?;
        Ok(value.as_deref() == Some("1"))
    }

    /// Clear the dirty flag after a successful snapshot flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn clear_dirty(&mut self) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('dirty', '0')",
            [],
        )?;
        Ok(())
    }

    // === Snapshot support ===

    /// All tags in snapshot order (by ID, so exports diff cleanly).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn all_tags(&self) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM tags ORDER BY id")?;
        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    /// All issues in snapshot order, tag lists populated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn all_issues(&self) -> Result<Vec<Issue>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, created_at, modified_at, completed, priority
             FROM issues ORDER BY id",
        )?;
        let mut issues = stmt
            .query_map([], issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for issue in &mut issues {
            issue.tags = self.tags_for_issue(&issue.id)?;
        }
        Ok(issues)
    }

    /// Replace the entire store contents with the given records, in one
    /// transaction. Used when the remote replica changes under us; the
    /// store ends up clean (it now matches the snapshot).
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails (rolled back, store unchanged).
    pub fn replace_all(&mut self, tags: &[Tag], issues: &[Issue]) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM issue_tags", [])?;
        tx.execute("DELETE FROM issues", [])?;
        tx.execute("DELETE FROM tags", [])?;

        for tag in tags {
            insert_tag_in_tx(&tx, tag)?;
        }
        for issue in issues {
            insert_issue_in_tx(&tx, issue)?;
            for tag_id in &issue.tags {
                attach_in_tx(&tx, &issue.id, tag_id)?;
            }
        }

        set_dirty_in_tx(&tx, false)?;
        tx.commit()?;

        tracing::debug!(
            tags = tags.len(),
            issues = issues.len(),
            "store refreshed from snapshot"
        );
        Ok(())
    }

    fn tags_for_issue(&self, issue_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tag_id FROM issue_tags WHERE issue_id = ? ORDER BY tag_id")?;
        let tags = stmt
            .query_map([issue_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tags)
    }
}

/// Fields to update on an issue. `content` uses the nested-option pattern
/// so "set to empty" and "leave alone" stay distinguishable.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub content: Option<Option<String>>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl IssueUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
    }
}

pub(crate) fn issue_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Issue> {
    let content: String = row.get(2)?;
    Ok(Issue {
        id: row.get(0)?,
        title: row.get(1)?,
        content: if content.is_empty() {
            None
        } else {
            Some(content)
        },
        created_at: parse_ts(&row.get::<_, String>(3)?),
        modified_at: parse_ts(&row.get::<_, String>(4)?),
        completed: row.get::<_, i32>(5)? != 0,
        priority: Priority(row.get(6)?),
        tags: vec![],
    })
}

fn insert_tag_in_tx(tx: &Transaction<'_>, tag: &Tag) -> Result<()> {
    tx.execute(
        "INSERT INTO tags (id, name) VALUES (?, ?)",
        [&tag.id, &tag.name],
    )?;
    Ok(())
}

fn insert_issue_in_tx(tx: &Transaction<'_>, issue: &Issue) -> Result<()> {
    tx.execute(
        "INSERT INTO issues (id, title, content, created_at, modified_at, completed, priority)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            issue.id,
            issue.title,
            issue.content.as_deref().unwrap_or(""),
            format_ts(issue.created_at),
            format_ts(issue.modified_at),
            i32::from(issue.completed),
            issue.priority.0,
        ],
    )?;
    Ok(())
}

fn attach_in_tx(tx: &Transaction<'_>, issue_id: &str, tag_id: &str) -> Result<()> {
    tx.execute(
        "INSERT OR IGNORE INTO issue_tags (issue_id, tag_id) VALUES (?, ?)",
        [issue_id, tag_id],
    )?;
    Ok(())
}

/// Advance an issue's modification timestamp, clamped non-decreasing.
fn touch_issue_in_tx(tx: &Transaction<'_>, issue_id: &str) -> Result<()> {
    tx.execute(
        "UPDATE issues SET modified_at = MAX(modified_at, ?) WHERE id = ?",
        [format_ts(Utc::now()), issue_id.to_string()],
    )?;
    Ok(())
}

fn set_dirty_in_tx(tx: &Transaction<'_>, dirty: bool) -> Result<()> {
    tx.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('dirty', ?)",
        [if dirty { "1" } else { "0" }],
    )?;
    Ok(())
}

fn row_exists(tx: &Transaction<'_>, table: &str, entity_id: &str) -> bool {
    // Table names are compile-time constants here, never user input.
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?");
    tx.prepare(&sql)
        .and_then(|mut stmt| stmt.exists([entity_id]))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DEFAULT_ISSUE_TITLE;

    #[test]
    fn creating_tags_and_issues_counts_match() {
        let mut store = TrackerStore::open_memory().unwrap();
        store.create_sample_data(5, 10).unwrap();

        assert_eq!(store.count(EntityKind::Tag).unwrap(), 5);
        assert_eq!(store.count(EntityKind::Issue).unwrap(), 50);
    }

    #[test]
    fn deleting_tag_does_not_delete_issues() {
        let mut store = TrackerStore::open_memory().unwrap();
        store.create_sample_data(5, 10).unwrap();

        let tags = store.list_tags().unwrap();
        store.delete_tag(&tags[0].id).unwrap();

        assert_eq!(store.count(EntityKind::Tag).unwrap(), 4);
        assert_eq!(store.count(EntityKind::Issue).unwrap(), 50);
    }

    #[test]
    fn delete_all_clears_everything() {
        let mut store = TrackerStore::open_memory().unwrap();
        store.create_sample_data(3, 4).unwrap();
        store.delete_all().unwrap();

        assert_eq!(store.count(EntityKind::Tag).unwrap(), 0);
        assert_eq!(store.count(EntityKind::Issue).unwrap(), 0);
    }

    #[test]
    fn new_tag_gets_default_name() {
        let mut store = TrackerStore::open_memory().unwrap();
        let tag = store.create_tag(None).unwrap();
        assert_eq!(tag.name, DEFAULT_TAG_NAME);
        assert!(tag.id.starts_with("tag-"));
    }

    #[test]
    fn new_issue_attaches_to_selected_tag() {
        let mut store = TrackerStore::open_memory().unwrap();
        let tag = store.create_tag(Some("Home")).unwrap();
        let issue = store.create_issue(Some(&tag.id)).unwrap();

        assert_eq!(issue.title, DEFAULT_ISSUE_TITLE);
        assert_eq!(issue.tags, vec![tag.id.clone()]);

        let reloaded = store.get_issue(&issue.id).unwrap().unwrap();
        assert_eq!(reloaded.tags, vec![tag.id]);
    }

    #[test]
    fn create_issue_with_unknown_tag_fails() {
        let mut store = TrackerStore::open_memory().unwrap();
        let err = store.create_issue(Some("tag-nope")).unwrap_err();
        assert!(matches!(err, TrackerError::TagNotFound { .. }));
        assert_eq!(store.count(EntityKind::Issue).unwrap(), 0);
    }

    #[test]
    fn update_advances_modification_date() {
        let mut store = TrackerStore::open_memory().unwrap();
        let issue = store.create_issue(None).unwrap();
        let before = issue.modified_at;

        let updated = store
            .update_issue(
                &issue.id,
                &IssueUpdate {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert!(updated.modified_at >= before);
        assert_eq!(updated.created_at, issue.created_at);
    }

    #[test]
    fn empty_update_is_a_noop() {
        let mut store = TrackerStore::open_memory().unwrap();
        let created = store.create_issue(None).unwrap();
        // Compare against the stored row, not the in-memory value, so
        // timestamp precision matches
        let stored = store.get_issue(&created.id).unwrap().unwrap();
        let unchanged = store
            .update_issue(&created.id, &IssueUpdate::default())
            .unwrap();
        assert_eq!(unchanged.modified_at, stored.modified_at);
    }

    #[test]
    fn add_and_remove_tag_keep_join_symmetric() {
        let mut store = TrackerStore::open_memory().unwrap();
        let tag = store.create_tag(Some("Work")).unwrap();
        let issue = store.create_issue(None).unwrap();

        store.add_tag_to_issue(&issue.id, &tag.id).unwrap();
        // Adding twice is a no-op, not an error
        store.add_tag_to_issue(&issue.id, &tag.id).unwrap();
        assert_eq!(
            store.get_issue(&issue.id).unwrap().unwrap().tags,
            vec![tag.id.clone()]
        );

        store.remove_tag_from_issue(&issue.id, &tag.id).unwrap();
        assert!(store.get_issue(&issue.id).unwrap().unwrap().tags.is_empty());
        // Both entities survive the detach
        assert_eq!(store.count(EntityKind::Tag).unwrap(), 1);
        assert_eq!(store.count(EntityKind::Issue).unwrap(), 1);
    }

    #[test]
    fn completed_count_tracks_closed_issues() {
        let mut store = TrackerStore::open_memory().unwrap();
        for n in 0..4 {
            let issue = store.create_issue(None).unwrap();
            if n % 2 == 0 {
                store
                    .update_issue(
                        &issue.id,
                        &IssueUpdate {
                            completed: Some(true),
                            ..Default::default()
                        },
                    )
                    .unwrap();
            }
        }
        assert_eq!(store.count_completed_issues().unwrap(), 2);
    }

    #[test]
    fn mutations_set_dirty_flag() {
        let mut store = TrackerStore::open_memory().unwrap();
        assert!(!store.is_dirty().unwrap());

        store.create_tag(None).unwrap();
        assert!(store.is_dirty().unwrap());

        store.clear_dirty().unwrap();
        assert!(!store.is_dirty().unwrap());
    }

    #[test]
    fn delete_missing_tag_reports_not_found() {
        let mut store = TrackerStore::open_memory().unwrap();
        let err = store.delete_tag("tag-void").unwrap_err();
        assert!(matches!(err, TrackerError::TagNotFound { .. }));
    }

    #[test]
    fn replace_all_swaps_contents_and_clears_dirty() {
        let mut store = TrackerStore::open_memory().unwrap();
        store.create_sample_data(2, 2).unwrap();

        let now = Utc::now();
        let tag = Tag {
            id: "tag-aaaaaa".to_string(),
            name: "Imported".to_string(),
        };
        let mut issue = Issue::new("iss-aaaaaa", now);
        issue.tags = vec![tag.id.clone()];

        store.replace_all(&[tag], &[issue]).unwrap();

        assert_eq!(store.count(EntityKind::Tag).unwrap(), 1);
        assert_eq!(store.count(EntityKind::Issue).unwrap(), 1);
        assert!(!store.is_dirty().unwrap());
    }
}

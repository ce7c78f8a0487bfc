//! Filter composition and query evaluation.
//!
//! A [`FilterRequest`] is an explicit value describing one query: scope,
//! free-text search, extra tag tokens, priority/status constraints, and a
//! sort specification. [`build_predicate`] compiles it into an AND-ed
//! clause set with bound parameters; the listing functions evaluate the
//! result against the store. Read operations are side-effect-free and
//! re-derive results on every call.

use crate::error::Result;
use crate::model::{Issue, Priority, Tag};
use crate::storage::TrackerStore;
use crate::storage::sqlite::issue_from_row;
use crate::util::time::format_ts;
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

/// Character that activates tag suggestions in raw filter text.
pub const SUGGESTION_TRIGGER: char = '#';

/// Primary scope of a filter request. Exactly one scope clause is always
/// present; "no filter selected" is the all-time smart scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Issues whose modification date is newer than the cutoff.
    Smart { cutoff: DateTime<Utc> },
    /// Issues carrying one specific tag. The date cutoff does not apply.
    Tag { tag_id: String },
}

impl Scope {
    /// All issues, any age.
    #[must_use]
    pub const fn all() -> Self {
        Self::Smart {
            cutoff: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    /// Issues modified within the last `days` days.
    #[must_use]
    pub fn recent(days: i64) -> Self {
        Self::Smart {
            cutoff: Utc::now() - Duration::days(days),
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::all()
    }
}

/// Completion-status constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StatusFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(crate::error::TrackerError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Timestamp the result list is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Created,
    Modified,
}

impl SortField {
    const fn column(self) -> &'static str {
        match self {
            Self::Created => "created_at",
            Self::Modified => "modified_at",
        }
    }
}

impl FromStr for SortField {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "created" | "created_at" => Ok(Self::Created),
            "modified" | "modified_at" => Ok(Self::Modified),
            other => Err(crate::error::TrackerError::validation(
                "sort",
                format!("unknown sort field '{other}' (use created or modified)"),
            )),
        }
    }
}

/// One query, described as a value. Never persisted.
#[derive(Debug, Clone)]
pub struct FilterRequest {
    pub scope: Scope,
    /// Raw filter text, matched against titles and content. A leading
    /// [`SUGGESTION_TRIGGER`] additionally activates tag suggestions.
    pub search: String,
    /// Additional required tag IDs. Every token must match (AND).
    pub tokens: Vec<String>,
    /// Gate for the priority and status constraints.
    pub filter_enabled: bool,
    /// Exact priority to match; `None` means any.
    pub priority: Option<Priority>,
    pub status: StatusFilter,
    pub sort: SortField,
    pub newest_first: bool,
}

impl Default for FilterRequest {
    fn default() -> Self {
        Self {
            scope: Scope::default(),
            search: String::new(),
            tokens: vec![],
            filter_enabled: false,
            priority: None,
            status: StatusFilter::All,
            sort: SortField::default(),
            newest_first: true,
        }
    }
}

/// A compiled filter: AND-ed SQL clauses plus bound parameters.
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl Predicate {
    fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    fn bind(&mut self, param: impl rusqlite::ToSql + 'static) {
        self.params.push(Box::new(param));
    }

    /// Render the WHERE fragment. The clause set is never empty because
    /// the scope clause is always emitted.
    #[must_use]
    pub fn where_sql(&self) -> String {
        format!("WHERE {}", self.clauses.join(" AND "))
    }

    #[must_use]
    pub fn param_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(AsRef::as_ref).collect()
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}

const TAG_MEMBERSHIP: &str = "id IN (SELECT issue_id FROM issue_tags WHERE tag_id = ?)";

/// Compile a filter request into its predicate.
///
/// Clause order mirrors composition precedence: scope, text, tokens,
/// then the gated priority/status constraints.
#[must_use]
pub fn build_predicate(request: &FilterRequest) -> Predicate {
    let mut predicate = Predicate {
        clauses: vec![],
        params: vec![],
    };

    match &request.scope {
        Scope::Tag { tag_id } => {
            predicate.push(TAG_MEMBERSHIP);
            predicate.bind(tag_id.clone());
        }
        Scope::Smart { cutoff } => {
            predicate.push("modified_at > ?");
            predicate.bind(format_ts(*cutoff));
        }
    }

    let text = request.search.trim();
    if !text.is_empty() {
        predicate.push("(title LIKE ? OR content LIKE ?)");
        let pattern = format!("%{text}%");
        predicate.bind(pattern.clone());
        predicate.bind(pattern);
    }

    // Each token is its own AND-ed membership clause: an issue must carry
    // all listed tags, not any of them.
    for token in &request.tokens {
        predicate.push(TAG_MEMBERSHIP);
        predicate.bind(token.clone());
    }

    if request.filter_enabled {
        if let Some(priority) = request.priority {
            predicate.push("priority = ?");
            predicate.bind(priority.0);
        }
        if request.status != StatusFilter::All {
            predicate.push("completed = ?");
            predicate.bind(i32::from(request.status == StatusFilter::Closed));
        }
    }

    predicate
}

/// Render the ORDER BY fragment. Ties always break on issue ID so repeat
/// calls over unchanged data return the same ordering.
#[must_use]
pub fn order_sql(request: &FilterRequest) -> String {
    let direction = if request.newest_first { "DESC" } else { "ASC" };
    format!(
        "ORDER BY {} {direction}, id ASC",
        request.sort.column()
    )
}

/// Evaluate a filter request, returning the sorted issue list.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_issues(store: &TrackerStore, request: &FilterRequest) -> Result<Vec<Issue>> {
    let predicate = build_predicate(request);
    let sql = format!(
        "SELECT id, title, content, created_at, modified_at, completed, priority
         FROM issues {} {}",
        predicate.where_sql(),
        order_sql(request)
    );

    let mut stmt = store.connection().prepare(&sql)?;
    let issues = stmt
        .query_map(predicate.param_refs().as_slice(), issue_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(issues)
}

/// Count the issues a filter request matches, without materializing them.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_issues(store: &TrackerStore, request: &FilterRequest) -> Result<usize> {
    let predicate = build_predicate(request);
    let sql = format!(
        "SELECT COUNT(*) FROM issues {}",
        predicate.where_sql()
    );

    let n: i64 = store
        .connection()
        .query_row(&sql, predicate.param_refs().as_slice(), |row| row.get(0))?;
    Ok(usize::try_from(n).unwrap_or(0))
}

/// Suggest tags for raw filter text.
///
/// Only active when the text starts with [`SUGGESTION_TRIGGER`]. An empty
/// remainder suggests every tag; otherwise the remainder is matched as a
/// case-insensitive substring of the tag name. Sorted by name, then ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn suggest_tags(store: &TrackerStore, raw: &str) -> Result<Vec<Tag>> {
    let Some(rest) = raw.strip_prefix(SUGGESTION_TRIGGER) else {
        return Ok(vec![]);
    };

    let needle = rest.trim();
    if needle.is_empty() {
        return store.list_tags();
    }

    let mut stmt = store.connection().prepare(
        "SELECT id, name FROM tags WHERE name LIKE ? ORDER BY name COLLATE NOCASE, id",
    )?;
    let tags = stmt
        .query_map([format!("%{needle}%")], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Every tag not already attached to the issue, in suggestion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn missing_tags(store: &TrackerStore, issue_id: &str) -> Result<Vec<Tag>> {
    let mut stmt = store.connection().prepare(
        "SELECT id, name FROM tags
         WHERE id NOT IN (SELECT tag_id FROM issue_tags WHERE issue_id = ?)
         ORDER BY name COLLATE NOCASE, id",
    )?;
    let tags = stmt
        .query_map([issue_id], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(tags)
}

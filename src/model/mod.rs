//! Core data types for `tracker_rust`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Tag` - A user-defined label, owning a set of issues
//! - `Issue` - The core work item
//! - `Priority` - Three-level ordinal priority
//! - `EntityKind` - Entity selector for count queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(b: &bool) -> bool {
    !*b
}

/// Title assigned to issues created without one.
pub const DEFAULT_ISSUE_TITLE: &str = "New issue";

/// Name assigned to tags created without one.
pub const DEFAULT_TAG_NAME: &str = "New tag";

/// Issue priority (0=Low, 1=Medium, 2=High).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const LOW: Self = Self(0);
    pub const MEDIUM: Self = Self(1);
    pub const HIGH: Self = Self(2);

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self.0 {
            0 => "low",
            2 => "high",
            _ => "medium",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "low" => Ok(Self::LOW),
            "1" | "medium" => Ok(Self::MEDIUM),
            "2" | "high" => Ok(Self::HIGH),
            other => Err(crate::error::TrackerError::InvalidPriority {
                priority: other.to_string(),
            }),
        }
    }
}

/// A user-defined label grouping issues (many-to-many).
///
/// The `id` is generated once at creation and never changes; the name is
/// free text and an empty name displays as "None".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

impl Tag {
    /// Name as shown to collaborators; empty names render as "None".
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "None"
        } else {
            &self.name
        }
    }
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Unique ID (e.g., "iss-abc123").
    pub id: String,

    /// Title (placeholder text when unset).
    pub title: String,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Creation timestamp. Set once, immutable.
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp. Monotonically non-decreasing;
    /// the sort/filter pivot for smart filters.
    pub modified_at: DateTime<Utc>,

    /// Whether the issue is closed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub completed: bool,

    /// Priority (0=Low, 1=Medium, 2=High).
    #[serde(default)]
    pub priority: Priority,

    /// Tag IDs this issue carries. The join table is canonical; this list
    /// is populated for export and display.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
}

impl Issue {
    /// Construct a fresh issue with placeholder title and default priority.
    #[must_use]
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_ISSUE_TITLE.to_string(),
            content: None,
            created_at: now,
            modified_at: now,
            completed: false,
            priority: Priority::default(),
            tags: vec![],
        }
    }

    /// Advance the modification timestamp. Clamped so `modified_at` never
    /// moves backwards even under clock skew.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = self.modified_at.max(now);
    }

    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.completed { "Closed" } else { "Open" }
    }
}

/// Entity selector for count queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tag,
    Issue,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag => write!(f, "tag"),
            Self::Issue => write!(f, "issue"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = crate::error::TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tag" | "tags" => Ok(Self::Tag),
            "issue" | "issues" => Ok(Self::Issue),
            other => Err(crate::error::TrackerError::validation(
                "kind",
                format!("unknown entity kind '{other}' (use tag or issue)"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn priority_parse_accepts_names_and_ordinals() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::HIGH);
        assert_eq!("0".parse::<Priority>().unwrap(), Priority::LOW);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_serializes_transparently() {
        let json = serde_json::to_string(&Priority::HIGH).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn tag_empty_name_displays_as_none() {
        let tag = Tag {
            id: "tag-abc".to_string(),
            name: String::new(),
        };
        assert_eq!(tag.display_name(), "None");
    }

    #[test]
    fn new_issue_uses_placeholder_defaults() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let issue = Issue::new("iss-123", now);
        assert_eq!(issue.title, DEFAULT_ISSUE_TITLE);
        assert_eq!(issue.priority, Priority::MEDIUM);
        assert!(!issue.completed);
        assert_eq!(issue.created_at, issue.modified_at);
    }

    #[test]
    fn touch_never_moves_modified_backwards() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut issue = Issue::new("iss-123", now);
        issue.touch(now - Duration::hours(1));
        assert_eq!(issue.modified_at, now);
        issue.touch(now + Duration::hours(1));
        assert_eq!(issue.modified_at, now + Duration::hours(1));
    }

    #[test]
    fn issue_deserialize_defaults_missing_fields() {
        let json = r#"{
            "id": "iss-123",
            "title": "Test issue",
            "created_at": "2026-01-01T00:00:00Z",
            "modified_at": "2026-01-01T00:00:00Z"
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert!(issue.content.is_none());
        assert!(!issue.completed);
        assert_eq!(issue.priority, Priority::MEDIUM);
        assert!(issue.tags.is_empty());
    }

    #[test]
    fn issue_serialization_skips_empty_fields() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let issue = Issue::new("iss-123", now);
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"id\":\"iss-123\""));
        assert!(!json.contains("content"));
        assert!(!json.contains("completed"));
        assert!(!json.contains("tags"));
    }
}

//! Error types and handling for `tracker_rust`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for wrapped one-off errors
//! - Provides recovery hints for user-facing errors
//! - Read paths at the `Tracker` facade never surface these; they degrade
//!   to empty results and log instead

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `tracker_rust` operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // === Storage Errors ===
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Entity Errors ===
    /// Tag with the specified ID was not found.
    #[error("Tag not found: {id}")]
    TagNotFound { id: String },

    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid priority value.
    #[error("Priority must be low (0), medium (1) or high (2), got: {priority}")]
    InvalidPriority { priority: String },

    /// Invalid status filter value.
    #[error("Invalid status filter: {status}")]
    InvalidStatus { status: String },

    // === Snapshot Errors ===
    /// Failed to parse a line in the snapshot file.
    #[error("Snapshot parse error at line {line}: {reason}")]
    SnapshotParse { line: usize, reason: String },

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracker workspace not initialized.
    #[error("Tracker not initialized: run 'trk init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error for one-off failure paths.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::AlreadyInitialized { .. }
                | Self::TagNotFound { .. }
                | Self::IssueNotFound { .. }
                | Self::Validation { .. }
                | Self::InvalidPriority { .. }
                | Self::InvalidStatus { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: trk init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::TagNotFound { .. } => Some("Run 'trk tag list' to see known tags"),
            Self::IssueNotFound { .. } => Some("Run 'trk list' to see known issues"),
            Self::InvalidPriority { .. } => Some("Use low, medium or high (or 0-2)"),
            Self::InvalidStatus { .. } => Some("Valid status filters: all, open, closed"),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Machine-readable error envelope for `--json` output.
#[derive(Debug, serde::Serialize)]
pub struct StructuredError {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
}

impl StructuredError {
    #[must_use]
    pub fn from_error(err: &TrackerError) -> Self {
        let code = match err {
            TrackerError::Database(_) => "database",
            TrackerError::TagNotFound { .. } => "tag_not_found",
            TrackerError::IssueNotFound { .. } => "issue_not_found",
            TrackerError::Validation { .. } => "validation",
            TrackerError::InvalidPriority { .. } => "invalid_priority",
            TrackerError::InvalidStatus { .. } => "invalid_status",
            TrackerError::SnapshotParse { .. } => "snapshot_parse",
            TrackerError::Config(_) => "config",
            TrackerError::NotInitialized => "not_initialized",
            TrackerError::AlreadyInitialized { .. } => "already_initialized",
            TrackerError::Io(_) => "io",
            TrackerError::Json(_) => "json",
            TrackerError::Yaml(_) => "yaml",
            TrackerError::Other(_) => "other",
        };
        Self {
            code,
            message: err.to_string(),
            suggestion: err.suggestion(),
        }
    }

    /// Render as a human-readable error line (plus suggestion when known).
    #[must_use]
    pub fn to_human(&self) -> String {
        self.suggestion.map_or_else(
            || format!("Error: {}", self.message),
            |hint| format!("Error: {}\nHint: {hint}", self.message),
        )
    }
}

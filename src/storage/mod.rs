//! Durable storage: SQLite entity store, schema, and save coordination.

pub mod save;
pub mod schema;
pub mod sqlite;

pub use save::{SaveCoordinator, SaveState};
pub use sqlite::{IssueUpdate, TrackerStore};

//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Personal issue tracker (`SQLite` + JSONL replica)
#[derive(Parser, Debug)]
#[command(name = "trk", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (auto-discover .tracker/*.db if not set)
    #[arg(long, global = true, env = "TRK_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a tracker workspace
    Init {
        /// Overwrite existing DB
        #[arg(long)]
        force: bool,
    },

    /// Create a new issue
    Create(CreateArgs),

    /// Update an issue
    Update(UpdateArgs),

    /// List issues matching a filter
    List(ListArgs),

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Suggest tags for raw filter text
    Suggest {
        /// Filter text; suggestions trigger on a leading '#'
        text: String,
    },

    /// Show the award board
    Awards,

    /// Count entities
    Count(CountArgs),

    /// Delete issues, or everything
    Delete(DeleteArgs),

    /// Flush unsaved changes to the replica snapshot
    Flush,

    /// Populate sample tags and issues
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Issue title (placeholder text when omitted)
    pub title: Option<String>,

    /// Attach to a tag (ID or exact name)
    #[arg(long)]
    pub tag: Option<String>,

    /// Issue description
    #[arg(long)]
    pub content: Option<String>,

    /// Priority: low, medium, high (or 0-2)
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Issue ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description (empty string clears it)
    #[arg(long)]
    pub content: Option<String>,

    /// Priority: low, medium, high (or 0-2)
    #[arg(long)]
    pub priority: Option<String>,

    /// Close the issue
    #[arg(long)]
    pub close: bool,

    /// Reopen the issue
    #[arg(long, conflicts_with = "close")]
    pub reopen: bool,

    /// Attach a tag (ID or exact name)
    #[arg(long)]
    pub add_tag: Option<String>,

    /// Detach a tag (ID or exact name)
    #[arg(long)]
    pub remove_tag: Option<String>,
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct ListArgs {
    /// Scope to one tag (ID or exact name); the recency cutoff is ignored
    #[arg(long)]
    pub tag: Option<String>,

    /// Only issues modified within the configured recent window
    #[arg(long, conflicts_with = "tag")]
    pub recent: bool,

    /// Only issues modified after this cutoff (e.g. 7d, 2026-01-15)
    #[arg(long, conflicts_with_all = ["tag", "recent"])]
    pub since: Option<String>,

    /// Free-text search over title and content
    #[arg(long)]
    pub search: Option<String>,

    /// Require this tag as well (repeatable; every token must match)
    #[arg(long = "token")]
    pub tokens: Vec<String>,

    /// Priority: low, medium, high (or 0-2)
    #[arg(long)]
    pub priority: Option<String>,

    /// Completion status: all, open, closed
    #[arg(long)]
    pub status: Option<String>,

    /// Sort key: created or modified
    #[arg(long)]
    pub sort: Option<String>,

    /// Oldest first instead of newest first
    #[arg(long)]
    pub oldest_first: bool,

    /// Print only the number of matching issues
    #[arg(long)]
    pub count: bool,
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Create a tag
    Add {
        /// Tag name (default name when omitted)
        name: Option<String>,
    },

    /// Rename a tag
    Rename {
        /// Tag ID or exact name
        id: String,
        /// New name
        name: String,
    },

    /// Delete a tag (its issues survive)
    Delete {
        /// Tag ID or exact name
        id: String,
    },

    /// List all tags
    List,

    /// List the tags an issue does not carry yet
    Missing {
        /// Issue ID
        issue_id: String,
    },
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Entity kind: tag or issue (both when omitted)
    pub kind: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Issue IDs to delete
    pub ids: Vec<String>,

    /// Delete every tag and issue
    #[arg(long, conflicts_with = "ids")]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Number of sample tags
    #[arg(long, default_value_t = 5)]
    pub tags: usize,

    /// Issues created per tag
    #[arg(long, default_value_t = 10)]
    pub issues: usize,
}

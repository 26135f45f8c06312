//! CLI command definitions for tasksheet.
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sheet-backed task tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the store file (overrides config)
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision the task store. Destructive on an existing store
    Init {
        /// Reset an already-initialized store
        #[arg(long)]
        force: bool,
    },

    /// Add a single task
    Add(AddArgs),

    /// Add many tasks from a JSON file of drafts
    Batch {
        /// Path to a JSON array of task drafts
        file: PathBuf,
    },

    /// Mark a task as completed
    Done {
        /// Task id
        id: u64,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: u64,
    },

    /// List tasks
    List(ListArgs),

    /// Print aggregate analytics
    Stats {
        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Task title
    pub title: String,

    /// Priority: low, medium, high, critical (unrecognized falls back to medium)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Due date (YYYY-MM-DD); unparseable input is stored as absent
    #[arg(short, long)]
    pub due: Option<String>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Comma-separated tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Assignee
    #[arg(short, long)]
    pub assignee: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter to one status (pending, in_progress, completed, blocked)
    #[arg(long)]
    pub status: Option<String>,

    /// Bypass the task-list cache and read the store directly
    #[arg(long)]
    pub no_cache: bool,
}

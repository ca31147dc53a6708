//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::list::ListArgs;
use crate::commands::log::LogArgs;

/// A log of walks, meals and the rest of a dog's day.
///
/// Events are grouped by day. While a walk is in progress the quick actions
/// switch to what happens on a walk.
#[derive(Debug, Parser)]
#[command(name = "doglog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log an event.
    Log(LogArgs),

    /// Start a walk.
    Begin {
        /// Free-text note.
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Finish the current walk.
    End {
        /// Free-text note.
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete an event.
    Delete {
        /// ID of the event to delete.
        id: String,
    },

    /// Show a single event.
    Show {
        /// ID of the event to show.
        id: String,
    },

    /// List events grouped by day, most recent first.
    List(ListArgs),

    /// Show whether a walk is in progress and which quick actions apply.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List event types with their codes and display metadata.
    Types,
}

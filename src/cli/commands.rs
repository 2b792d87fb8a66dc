use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(
    name = "todo-matrix",
    version = crate::VERSION,
    about = "Eisenhower matrix task service",
    after_help = "\
NOTE:
  Settings are read from todo-matrix.toml (or --config); a missing file means defaults.
  Run `todo-matrix init` before any other command.

EXIT CODES:
  0  Success
  1  Error (config, DB, validation, not found, failed reconciliation)

CLASSIFICATION:
  A task is urgent when its deadline is at most 3 days away or overdue.
  Q1 important+urgent, Q2 important, Q3 urgent, Q4 neither.
  Without a deadline, --urgent is kept until the next reconciliation pass."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and run migrations
    Init,

    /// Run the HTTP API and the reconciliation scheduler until Ctrl-C
    Serve,

    /// Run one reconciliation pass now
    #[command(after_help = "\
NOTE:
  Recomputes urgency and quadrant for every incomplete task and commits the
  changed rows in one transaction. Exits 1 if the pass failed; nothing is written then.")]
    Reconcile {
        /// Reference date (YYYY-MM-DD), defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Add a task
    Add {
        /// Task title (3-100 characters)
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        important: bool,
        /// Only used when no deadline is given
        #[arg(long)]
        urgent: bool,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Reference date (YYYY-MM-DD), defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Mark a task completed
    Complete {
        id: i64,
    },

    /// List tasks
    List {
        /// Only this quadrant (Q1, Q2, Q3, Q4)
        #[arg(long)]
        quadrant: Option<String>,
        /// Only `completed` or `pending` tasks
        #[arg(long)]
        status: Option<String>,
    },

    /// Show task counts by quadrant and status
    Stats,
}

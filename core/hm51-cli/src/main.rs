//! hm51: terminal client for the Hybrid Master 51 training program.
//!
//! One command per invocation; state lives in the progress store under the
//! data directory (`~/.hm51` unless `--data-dir` overrides it).
//!
//! ## Subcommands
//!
//! - `show` / `status`: render the day's workout and current progress
//! - `complete` / `uncomplete` / `weight`: session mutations
//! - `rest`: run a rest countdown in the terminal
//! - `end` / `reset` / `goto`: session lifecycle and navigation
//! - `history` / `export` / `import` / `config`: store management

mod commands;
mod logging;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hm51_core::StorageConfig;

#[derive(Parser)]
#[command(name = "hm51")]
#[command(about = "Hybrid Master 51 workout tracker")]
#[command(version)]
struct Cli {
    /// Data directory (default: ~/.hm51)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a day's workout with progress marks
    Show {
        /// Program week (default: current position)
        #[arg(long)]
        week: Option<u32>,

        /// Day identifier, e.g. dimanche, mardi, jeudi, maison
        #[arg(long)]
        day: Option<String>,
    },

    /// Current position, session progress, and store info
    Status,

    /// Mark a set complete (1-based set number)
    Complete {
        /// Exercise id or unique name prefix
        exercise: String,

        /// Set number, counting from 1
        set: u32,

        /// Skip the automatic rest countdown
        #[arg(long)]
        no_timer: bool,
    },

    /// Unmark a completed set
    Uncomplete {
        /// Exercise id or unique name prefix
        exercise: String,

        /// Set number, counting from 1
        set: u32,
    },

    /// Override the working weight (all sets unless --set)
    Weight {
        /// Exercise id or unique name prefix
        exercise: String,

        /// Weight in kg
        weight: f64,

        /// Apply to this set only, counting from 1
        #[arg(long)]
        set: Option<u32>,
    },

    /// Run a standalone rest countdown
    Rest {
        /// Duration in seconds
        seconds: u32,
    },

    /// End the session: print the summary and record it in history
    End,

    /// Clear the current day's progress (memory and storage)
    Reset,

    /// Jump to a program week and day
    Goto {
        /// Program week (1-26)
        week: u32,

        /// Day identifier
        day: String,
    },

    /// Recent session history
    History {
        /// Number of entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Export all stored data as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Import previously exported data
    Import {
        /// Path to an exported JSON document
        path: PathBuf,
    },

    /// View or change settings
    Config {
        /// Terminal bell when a rest countdown completes
        #[arg(long, value_enum)]
        sound: Option<OnOff>,

        /// Automatic rest countdown after completing a set
        #[arg(long, value_enum)]
        auto_timer: Option<OnOff>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnOff {
    On,
    Off,
}

impl OnOff {
    fn as_bool(self) -> bool {
        matches!(self, OnOff::On)
    }
}

fn main() {
    let cli = Cli::parse();
    let config = match &cli.data_dir {
        Some(dir) => StorageConfig::with_root(dir.clone()),
        None => StorageConfig::default(),
    };
    let _logging_guard = logging::init(&config);

    if let Err(err) = commands::run(cli.command, &config) {
        tracing::error!(error = %err, "hm51 command failed");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

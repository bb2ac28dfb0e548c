use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tank", bin_name = "tank", version)]
#[command(about = "Directory-backed fish registry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage root (overrides config and TANK_ROOT)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Config file to load
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Append the operation log to this file
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new fish (requires name, userName, apiKey)
    Create {
        /// Fish attributes as a JSON object; read from stdin if omitted
        json: Option<String>,
    },

    /// List every fish, keyed by name
    #[command(alias = "ls")]
    List {
        /// Leave soft-deleted fish out
        #[arg(long)]
        hide_deleted: bool,
    },

    /// Show one fish
    Get { name: String },

    /// Merge attribute changes into an existing fish
    Update {
        /// Changes as a JSON object including "name"; read from stdin if omitted
        json: Option<String>,
    },

    /// Remove a fish from disk
    #[command(alias = "rm")]
    Delete { name: String },

    /// Remove orphaned fish directories and stale temp files
    Sweep,

    /// Echo the parsed input without touching storage
    Noop { json: Option<String> },
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shift Time Tracker
///
/// Logs a work session from the terminal and emails an entry notification
/// on login and an exit notification with the elapsed time on logout.
#[derive(Parser, Debug)]
#[command(name = "punch-clock")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log notifications instead of sending them
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive tracker (default)
    Start {
        /// Prefill the name field
        #[arg(long)]
        name: Option<String>,

        /// Prefill the location field
        #[arg(long)]
        location: Option<String>,

        /// Prefill the email field
        #[arg(long)]
        email: Option<String>,
    },
    /// Write an example configuration file
    Init {
        /// Output path (defaults to the user config directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the effective configuration with keys masked
    ShowConfig,
}

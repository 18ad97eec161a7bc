use anyhow::Result;
use clap::Parser;
use std::path::Path;

mod cli;
mod commands;
mod config;
mod notify;
mod platform;
mod session;
mod ui;

use cli::{Args, Commands};
use commands::start::Prefill;
use commands::utils::{init_logging, load_config};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let explicit_config = args.config.as_deref();

    match args.command {
        Some(Commands::Init { output, force }) => {
            commands::run_init(output, explicit_config, force)?;
            Ok(())
        }
        Some(Commands::ShowConfig) => commands::run_show_config(explicit_config),
        Some(Commands::Start { name, location, email }) => {
            start(explicit_config, args.verbose, args.dry_run, Prefill { name, location, email })
        }
        None => start(explicit_config, args.verbose, args.dry_run, Prefill::default()),
    }
}

/// Load config, set up logging and run the tracker on a tokio runtime
fn start(
    explicit_config: Option<&Path>,
    verbose: bool,
    dry_run: bool,
    prefill: Prefill,
) -> Result<()> {
    let (source, config) = load_config(explicit_config)?;

    init_logging(verbose, &config.logging.level);
    source.log();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async { commands::run_start(config, dry_run, prefill).await })
}

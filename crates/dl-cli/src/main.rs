use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dl_cli::commands::{delete, list, log, show, status, types};
use dl_cli::{Cli, Commands, Config};
use dl_core::{EventLog, EventType};
use dl_db::Database;

/// Load config and open the event log, ensuring the database directory exists.
fn open_log(config_path: Option<&Path>) -> Result<EventLog<Database>> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let calendar = config.calendar().context("invalid utc_offset")?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok(EventLog::new(db, calendar))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Log(args)) => {
            let mut event_log = open_log(cli.config.as_deref())?;
            log::run(&mut out, &mut event_log, args)?;
        }
        Some(Commands::Begin { note }) => {
            let mut event_log = open_log(cli.config.as_deref())?;
            log::walk(&mut out, &mut event_log, EventType::WalkBegin, note.as_deref())?;
        }
        Some(Commands::End { note }) => {
            let mut event_log = open_log(cli.config.as_deref())?;
            log::walk(&mut out, &mut event_log, EventType::WalkEnd, note.as_deref())?;
        }
        Some(Commands::Delete { id }) => {
            let mut event_log = open_log(cli.config.as_deref())?;
            delete::run(&mut out, &mut event_log, id)?;
        }
        Some(Commands::Show { id }) => {
            let mut event_log = open_log(cli.config.as_deref())?;
            show::run(&mut out, &mut event_log, id)?;
        }
        Some(Commands::List(args)) => {
            let mut event_log = open_log(cli.config.as_deref())?;
            list::run(&mut out, &mut event_log, args)?;
        }
        Some(Commands::Status { json }) => {
            let event_log = open_log(cli.config.as_deref())?;
            status::run(&mut out, &event_log, *json)?;
        }
        Some(Commands::Types) => {
            // Types doesn't need config - the table is static
            types::run(&mut out)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}

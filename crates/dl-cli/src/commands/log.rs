//! Log command for recording events.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;

use dl_core::{EventLog, EventStore, EventType};

use super::util::{format_actions, parse_when, summarize};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Event type: walk-begin, walk-end, meal, snack, pee or poop.
    pub kind: EventType,

    /// Free-text note.
    #[arg(short, long)]
    pub note: Option<String>,

    /// When it happened: RFC 3339 or relative ("20 minutes ago"). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    log: &mut EventLog<S>,
    args: &LogArgs,
) -> Result<()> {
    record(
        writer,
        log,
        args.kind,
        args.note.as_deref(),
        args.at.as_deref(),
        Utc::now(),
    )
}

/// Starts or finishes a walk, refusing when that action is not on offer.
pub fn walk<W: Write, S: EventStore>(
    writer: &mut W,
    log: &mut EventLog<S>,
    kind: EventType,
    note: Option<&str>,
) -> Result<()> {
    let actions = log
        .walk_state()
        .available_actions()
        .context("failed to read walk state")?;
    if !actions.contains(&kind) {
        match kind {
            EventType::WalkBegin => bail!("a walk is already in progress"),
            _ => bail!("no walk in progress"),
        }
    }
    record(writer, log, kind, note, None, Utc::now())
}

/// Creates the event and shows the quick actions that now apply.
pub fn record<W: Write, S: EventStore>(
    writer: &mut W,
    log: &mut EventLog<S>,
    kind: EventType,
    note: Option<&str>,
    at: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let timestamp = match at {
        Some(at) => parse_when(at, now)?,
        None => now,
    };
    let event = log
        .create_at(kind, timestamp, note.unwrap_or_default())
        .context("failed to log event")?;
    writeln!(writer, "Logged {}", summarize(log.calendar(), &event))?;

    let actions = log
        .walk_state()
        .available_actions()
        .context("failed to read walk state")?;
    writeln!(writer, "Next: {}", format_actions(actions))?;
    Ok(())
}

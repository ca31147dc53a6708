//! Show command for printing a single event.

use std::io::Write;

use anyhow::{Context, Result, bail};

use dl_core::{EventId, EventLog, EventStore};

use super::util::{describe, format_time};

pub fn run<W: Write, S: EventStore>(writer: &mut W, log: &mut EventLog<S>, id: &str) -> Result<()> {
    let id = EventId::new(id.trim());
    let Some(event) = log.get(&id).context("failed to load event")? else {
        bail!("event not found: {id}");
    };

    let note = if event.note.is_empty() {
        "-"
    } else {
        event.note.as_str()
    };
    writeln!(writer, "ID:    {}", event.id)?;
    writeln!(writer, "Type:  {} ({})", describe(event.kind), event.kind)?;
    writeln!(
        writer,
        "Time:  {}",
        format_time(log.calendar(), event.timestamp, "%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(writer, "Day:   {}", event.day_bucket.format("%Y-%m-%d"))?;
    writeln!(writer, "Note:  {note}")?;
    Ok(())
}

//! Delete command for removing a logged event.

use std::io::Write;

use anyhow::{Context, Result, bail};

use dl_core::{EventId, EventLog, EventStore};

use super::util::{format_actions, summarize};

pub fn run<W: Write, S: EventStore>(writer: &mut W, log: &mut EventLog<S>, id: &str) -> Result<()> {
    let id = EventId::new(id.trim());
    let Some(event) = log.get(&id).context("failed to load event")? else {
        bail!("event not found: {id}");
    };

    log.delete(&id).context("failed to delete event")?;
    writeln!(writer, "Deleted {}", summarize(log.calendar(), &event))?;

    // Removing a walk boundary can change what is on offer.
    if event.kind.is_walk_boundary() {
        let actions = log
            .walk_state()
            .available_actions()
            .context("failed to read walk state")?;
        writeln!(writer, "Next: {}", format_actions(actions))?;
    }
    Ok(())
}

//! Types command for listing event types and their display metadata.

use std::io::Write;

use anyhow::Result;

use dl_core::EventType;

pub fn run<W: Write>(writer: &mut W) -> Result<()> {
    for kind in EventType::ALL {
        writeln!(
            writer,
            "{}  {:<10}  {}  {:<10}  {}",
            kind.code(),
            kind.name(),
            kind.glyph(),
            kind.label(),
            kind.color()
        )?;
    }
    Ok(())
}

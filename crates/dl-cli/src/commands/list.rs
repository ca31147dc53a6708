//! List command for showing events grouped by day.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use dl_core::{EventLog, EventStore};

use super::util::{describe, format_time};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show the most recent N days.
    #[arg(long)]
    pub days: Option<usize>,

    /// Output one JSON object per event.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write, S: EventStore>(
    writer: &mut W,
    log: &mut EventLog<S>,
    args: &ListArgs,
) -> Result<()> {
    let timeline = log.list().context("failed to load events")?;
    let days = timeline.days().take(args.days.unwrap_or(usize::MAX));

    if args.json {
        for group in days {
            for event in group.events {
                writeln!(writer, "{}", serde_json::to_string(event)?)?;
            }
        }
        return Ok(());
    }

    if timeline.is_empty() {
        writeln!(writer, "No events logged.")?;
        return Ok(());
    }

    let calendar = log.calendar();
    for (index, group) in days.enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", group.day.format("%Y-%m-%d"))?;
        for event in group.events {
            write!(
                writer,
                "  {}  {}  {}",
                format_time(calendar, event.timestamp, "%H:%M"),
                describe(event.kind),
                event.id
            )?;
            if !event.note.is_empty() {
                write!(writer, "  # {}", event.note)?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, TimeZone, Utc};
    use dl_core::{Calendar, Event, EventType, MemoryStore};
    use insta::assert_snapshot;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, minute, 0).unwrap()
    }

    fn seeded_log() -> (EventLog<MemoryStore>, Vec<Event>) {
        let mut log = EventLog::new(MemoryStore::new(), Calendar::utc());
        let events = vec![
            log.create_at(EventType::Meal, at(14, 18, 0), "").unwrap(),
            log.create_at(EventType::WalkBegin, at(15, 7, 30), "").unwrap(),
            log.create_at(EventType::Poop, at(15, 7, 45), "").unwrap(),
            log.create_at(EventType::WalkEnd, at(15, 8, 5), "").unwrap(),
            log.create_at(EventType::Snack, at(15, 12, 0), "carrot").unwrap(),
        ];
        (log, events)
    }

    fn redact(output: &str, events: &[Event]) -> String {
        events
            .iter()
            .enumerate()
            .fold(output.to_string(), |output, (index, event)| {
                output.replace(event.id.as_str(), &format!("[ID{}]", index + 1))
            })
    }

    #[test]
    fn list_groups_days_most_recent_first() {
        let (mut log, events) = seeded_log();
        let mut output = Vec::new();
        let args = ListArgs {
            days: None,
            json: false,
        };
        run(&mut output, &mut log, &args).unwrap();

        let output = redact(&String::from_utf8(output).unwrap(), &events);
        assert_snapshot!(output, @r"
        2026-01-15
          12:00  🍌 Snack  [ID5]  # carrot
          08:05  🏡 Walk Ended  [ID4]
          07:45  💩 Poop  [ID3]
          07:30  🏃🏼 Walk Began  [ID2]

        2026-01-14
          18:00  🍔 Meal  [ID1]
        ");
    }

    #[test]
    fn days_limits_groups() {
        let (mut log, _events) = seeded_log();
        let mut output = Vec::new();
        let args = ListArgs {
            days: Some(1),
            json: false,
        };
        run(&mut output, &mut log, &args).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("2026-01-15\n"));
        assert!(!output.contains("2026-01-14"));
        assert_eq!(output.lines().count(), 5);
    }

    #[test]
    fn json_emits_one_event_per_line() {
        let (mut log, events) = seeded_log();
        let mut output = Vec::new();
        let args = ListArgs {
            days: None,
            json: true,
        };
        run(&mut output, &mut log, &args).unwrap();

        let output = String::from_utf8(output).unwrap();
        let parsed: Vec<Event> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let expected: Vec<Event> = events.into_iter().rev().collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn empty_log_says_so() {
        let mut log = EventLog::new(MemoryStore::new(), Calendar::utc());
        let mut output = Vec::new();
        let args = ListArgs {
            days: None,
            json: false,
        };
        run(&mut output, &mut log, &args).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "No events logged.\n");
    }
}

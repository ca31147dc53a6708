//! Status command for showing the walk state and quick actions.

use std::io::Write;

use anyhow::{Context, Result};

use dl_core::{EventLog, EventStore, WalkState};

use super::util::{describe, format_time};

pub fn run<W: Write, S: EventStore>(writer: &mut W, log: &EventLog<S>, json: bool) -> Result<()> {
    let status = log
        .walk_state()
        .status()
        .context("failed to read walk state")?;
    let actions = status.state.available_actions();

    if json {
        let value = serde_json::json!({
            "walking": status.state.is_walking(),
            "since": status.since,
            "actions": actions,
        });
        writeln!(writer, "{value}")?;
        return Ok(());
    }

    let since = status
        .since
        .map(|since| format_time(log.calendar(), since, "%Y-%m-%d %H:%M"));
    match (status.state, since) {
        (WalkState::Walking, Some(since)) => writeln!(writer, "Walking since {since}")?,
        (WalkState::Walking, None) => writeln!(writer, "Walking")?,
        (WalkState::Idle, Some(since)) => {
            writeln!(writer, "Not walking (last walk ended {since})")?;
        }
        (WalkState::Idle, None) => writeln!(writer, "Not walking")?,
    }

    writeln!(writer, "Available actions:")?;
    for kind in actions {
        writeln!(writer, "- {kind}: {}", describe(*kind))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dl_core::{Calendar, EventType, MemoryStore};
    use insta::assert_snapshot;

    fn render(log: &EventLog<MemoryStore>, json: bool) -> String {
        let mut output = Vec::new();
        run(&mut output, log, json).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn empty_log_offers_walk_begin() {
        let log = EventLog::new(MemoryStore::new(), Calendar::utc());
        assert_snapshot!(render(&log, false), @r"
        Not walking
        Available actions:
        - walk_begin: 🏃🏼 Walk Began
        ");
    }

    #[test]
    fn walking_offers_walk_actions_in_order() {
        let mut log = EventLog::new(MemoryStore::new(), "+01:00".parse().unwrap());
        log.create_at(
            EventType::WalkBegin,
            Utc.with_ymd_and_hms(2026, 1, 15, 7, 30, 0).unwrap(),
            "",
        )
        .unwrap();
        log.create_at(
            EventType::Meal,
            Utc.with_ymd_and_hms(2026, 1, 15, 7, 40, 0).unwrap(),
            "",
        )
        .unwrap();

        assert_snapshot!(render(&log, false), @r"
        Walking since 2026-01-15 08:30
        Available actions:
        - pee: 🚽 Pee
        - poop: 💩 Poop
        - walk_end: 🏡 Walk Ended
        ");
    }

    #[test]
    fn finished_walk_reports_when_it_ended() {
        let mut log = EventLog::new(MemoryStore::new(), Calendar::utc());
        log.create_at(
            EventType::WalkBegin,
            Utc.with_ymd_and_hms(2026, 1, 15, 7, 30, 0).unwrap(),
            "",
        )
        .unwrap();
        log.create_at(
            EventType::WalkEnd,
            Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap(),
            "",
        )
        .unwrap();

        assert_snapshot!(render(&log, false), @r"
        Not walking (last walk ended 2026-01-15 08:00)
        Available actions:
        - walk_begin: 🏃🏼 Walk Began
        ");
    }

    #[test]
    fn json_output_matches_resolver() {
        let mut log = EventLog::new(MemoryStore::new(), Calendar::utc());
        let begin = log.create(EventType::WalkBegin).unwrap();

        let value: serde_json::Value = serde_json::from_str(&render(&log, true)).unwrap();
        assert_eq!(value["walking"], true);
        assert_eq!(
            value["actions"],
            serde_json::json!(["pee", "poop", "walk_end"])
        );
        let since: chrono::DateTime<Utc> =
            serde_json::from_value(value["since"].clone()).unwrap();
        assert_eq!(since, begin.timestamp);
    }
}

//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use dl_core::{Calendar, Event, EventType};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(m|min|minute|h|hour|d|day)s?\s+ago$").expect("valid regex")
});

/// Relative times further back than this are almost certainly typos.
const MAX_RELATIVE_MINUTES: i64 = 366 * 24 * 60;

/// Parse when an event happened, relative to `now`.
///
/// Supports:
/// - "now"
/// - RFC 3339: "2026-01-15T08:30:00Z", "2026-01-15T09:30:00+01:00"
/// - Relative: "20 minutes ago", "2 hours ago", "1 day ago", "15m ago"
pub fn parse_when(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use RFC 3339 (e.g., 2026-01-15T08:30:00Z) or relative (e.g., '20 minutes ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let minutes_per_unit = match &caps[2] {
        "m" | "min" | "minute" => 1,
        "h" | "hour" => 60,
        "d" | "day" => 60 * 24,
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > MAX_RELATIVE_MINUTES / minutes_per_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Glyph and label, e.g. "🚽 Pee".
pub fn describe(kind: EventType) -> String {
    format!("{} {}", kind.glyph(), kind.label())
}

/// Wall-clock time of an event in the log's calendar.
pub fn format_time(calendar: Calendar, timestamp: DateTime<Utc>, pattern: &str) -> String {
    calendar.wall_clock(timestamp).format(pattern).to_string()
}

/// One-line summary used after create and delete.
pub fn summarize(calendar: Calendar, event: &Event) -> String {
    format!(
        "{} at {} ({})",
        describe(event.kind),
        format_time(calendar, event.timestamp, "%Y-%m-%d %H:%M"),
        event.id
    )
}

/// Quick actions rendered on one line.
pub fn format_actions(actions: &[EventType]) -> String {
    actions
        .iter()
        .map(|kind| describe(*kind))
        .collect::<Vec<_>>()
        .join(" | ")
}

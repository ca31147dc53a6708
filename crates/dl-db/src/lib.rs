//! Storage layer for the dog log.
//!
//! Provides an [`EventStore`] backed by `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared. The log is a
//! single-user, single-writer store, so callers keep one `Database` on one
//! execution path.
//!
//! # Schema
//!
//! The schema version lives in `PRAGMA user_version`:
//! - v1: `events(id, timestamp, type, note)`
//! - v2: adds the nullable `day_bucket` column plus indexes
//!
//! Rows carried over from v1 keep a `NULL` day bucket until the event log
//! loads them and backfills it.
//!
//! ## Timestamp Format
//!
//! Timestamps are stored as TEXT in RFC 3339 with nanoseconds
//! (e.g., `2026-01-15T08:30:00.123456789Z`). Every write goes through the
//! same fixed-width formatter, so lexicographic order matches chronological
//! order and a loaded timestamp equals the one that was written. The v1
//! schema wrote milliseconds; those rows are rewritten during the v2
//! migration.
//!
//! Day buckets are stored as ISO dates (`2026-01-15`). The `type` column
//! holds the stable integer code of [`EventType`].

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, params, params_from_iter};
use thiserror::Error;
use uuid::Uuid;

use dl_core::{EventId, EventStore, EventType, NewEvent, PersistenceError, StoredEvent};

/// Schema version written by this build.
pub const SCHEMA_VERSION: i64 = 2;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The database was written by a newer build.
    #[error("database schema version {0} is newer than supported version {max}", max = SCHEMA_VERSION)]
    UnsupportedSchema(i64),
    /// Failed to parse an event timestamp.
    #[error("invalid timestamp for event {event_id}: {timestamp}")]
    TimestampParse {
        event_id: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Failed to parse a stored day bucket.
    #[error("invalid day bucket for event {event_id}: {day}")]
    DayBucketParse {
        event_id: String,
        day: String,
        #[source]
        source: chrono::ParseError,
    },
    /// No event with this ID.
    #[error("event not found: {0}")]
    NotFound(String),
}

impl From<DbError> for PersistenceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => Self::NotFound(EventId::new(id)),
            other => Self::backend(other),
        }
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// An event row as stored, before parsing.
#[derive(Debug)]
struct EventRow {
    id: String,
    timestamp: String,
    day_bucket: Option<String>,
    code: i32,
    note: String,
}

const EVENT_COLUMNS: &str = "id, timestamp, day_bucket, type, note";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// Pending schema migrations are applied on open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Current schema version.
    pub fn schema_version(&self) -> Result<i64, DbError> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Brings the schema up to [`SCHEMA_VERSION`].
    ///
    /// This is idempotent - safe to call on an up-to-date database.
    fn migrate(&mut self) -> Result<(), DbError> {
        let version = self.schema_version()?;
        if version > SCHEMA_VERSION {
            return Err(DbError::UnsupportedSchema(version));
        }
        if version == SCHEMA_VERSION {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        if version < 1 {
            tx.execute_batch(
                "
                -- Events table: one row per logged occurrence
                -- timestamp: RFC 3339 with nanoseconds (e.g., '2026-01-15T08:30:00.000000000Z')
                -- type: stable integer code, never renumbered
                CREATE TABLE IF NOT EXISTS events (
                    id TEXT PRIMARY KEY,
                    timestamp TEXT NOT NULL,
                    type INTEGER NOT NULL,
                    note TEXT NOT NULL DEFAULT ''
                );
                ",
            )?;
        }
        if version < 2 {
            if !has_column(&tx, "events", "day_bucket")? {
                tx.execute_batch("ALTER TABLE events ADD COLUMN day_bucket TEXT;")?;
            }
            tx.execute_batch(
                "
                CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);
                CREATE INDEX IF NOT EXISTS idx_events_type ON events(type, timestamp);
                CREATE INDEX IF NOT EXISTS idx_events_day_bucket ON events(day_bucket);
                ",
            )?;
            let rewritten = normalize_timestamps(&tx)?;
            tracing::debug!(rewritten, "normalized legacy timestamps");
        }
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
        tx.commit()?;
        tracing::info!(from = version, to = SCHEMA_VERSION, "migrated database schema");
        Ok(())
    }

    /// Inserts an event in its own transaction.
    pub fn insert_event(&mut self, event: &NewEvent) -> Result<StoredEvent, DbError> {
        let id = Uuid::new_v4().to_string();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO events (id, timestamp, day_bucket, type, note) VALUES (?, ?, ?, ?, ?)",
            params![
                id,
                format_timestamp(event.timestamp),
                format_day(event.day_bucket),
                event.kind.code(),
                event.note,
            ],
        )?;
        tx.commit()?;
        Ok(StoredEvent {
            id: EventId::new(id),
            timestamp: event.timestamp,
            day_bucket: Some(event.day_bucket),
            code: event.kind.code(),
            note: event.note.clone(),
        })
    }

    /// Deletes an event in its own transaction.
    pub fn delete_event(&mut self, id: &str) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM events WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    /// Loads one event by ID.
    pub fn get_event(&self, id: &str) -> Result<Option<StoredEvent>, DbError> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?");
        let mut stmt = self.conn.prepare(&query)?;
        let mut rows = stmt.query_map([id], read_row)?;
        rows.next().transpose()?.map(parse_row).transpose()
    }

    /// Lists all events, most recent first.
    ///
    /// Equal timestamps are ordered by insertion, later first.
    pub fn list_events(&self) -> Result<Vec<StoredEvent>, DbError> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY timestamp DESC, rowid DESC"
        );
        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map([], read_row)?;
        let mut events = Vec::new();
        for row in rows {
            events.push(parse_row(row?)?);
        }
        Ok(events)
    }

    /// The most recent event of any of the given types.
    pub fn latest_event_of_kinds(
        &self,
        kinds: &[EventType],
    ) -> Result<Option<StoredEvent>, DbError> {
        if kinds.is_empty() {
            return Ok(None);
        }
        let placeholders = vec!["?"; kinds.len()].join(", ");
        let query = format!(
            "
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE type IN ({placeholders})
            ORDER BY timestamp DESC, rowid DESC
            LIMIT 1
            "
        );
        let mut stmt = self.conn.prepare(&query)?;
        let mut rows =
            stmt.query_map(params_from_iter(kinds.iter().map(|kind| kind.code())), read_row)?;
        rows.next().transpose()?.map(parse_row).transpose()
    }

    /// Records the day bucket of an existing event.
    pub fn update_day_bucket(&mut self, id: &str, day: NaiveDate) -> Result<(), DbError> {
        let updated = self.conn.execute(
            "UPDATE events SET day_bucket = ? WHERE id = ?",
            params![format_day(day), id],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl EventStore for Database {
    fn insert(&mut self, event: &NewEvent) -> Result<StoredEvent, PersistenceError> {
        Ok(self.insert_event(event)?)
    }

    fn delete(&mut self, id: &EventId) -> Result<(), PersistenceError> {
        Ok(self.delete_event(id.as_str())?)
    }

    fn get(&self, id: &EventId) -> Result<Option<StoredEvent>, PersistenceError> {
        Ok(self.get_event(id.as_str())?)
    }

    fn latest_of_kinds(
        &self,
        kinds: &[EventType],
    ) -> Result<Option<StoredEvent>, PersistenceError> {
        Ok(self.latest_event_of_kinds(kinds)?)
    }

    fn list_newest_first(&self) -> Result<Vec<StoredEvent>, PersistenceError> {
        Ok(self.list_events()?)
    }

    fn set_day_bucket(&mut self, id: &EventId, day: NaiveDate) -> Result<(), PersistenceError> {
        Ok(self.update_day_bucket(id.as_str(), day)?)
    }
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, DbError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Rewrites every parseable timestamp into the canonical stored format.
///
/// Unparseable values are left as they are and reported when loaded.
fn normalize_timestamps(conn: &Connection) -> Result<usize, DbError> {
    let mut stmt = conn.prepare("SELECT id, timestamp FROM events")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut rewritten = 0;
    for (id, raw) in rows {
        let Ok(timestamp) = parse_timestamp(&raw, &id) else {
            continue;
        };
        let canonical = format_timestamp(timestamp);
        if canonical != raw {
            rewritten += conn.execute(
                "UPDATE events SET timestamp = ? WHERE id = ?",
                params![canonical, id],
            )?;
        }
    }
    Ok(rewritten)
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        day_bucket: row.get(2)?,
        code: row.get(3)?,
        note: row.get(4)?,
    })
}

fn parse_row(row: EventRow) -> Result<StoredEvent, DbError> {
    let timestamp = parse_timestamp(&row.timestamp, &row.id)?;
    let day_bucket = row
        .day_bucket
        .as_deref()
        .map(|day| parse_day(day, &row.id))
        .transpose()?;
    Ok(StoredEvent {
        id: EventId::new(row.id),
        timestamp,
        day_bucket,
        code: row.code,
        note: row.note,
    })
}

fn parse_timestamp(timestamp: &str, event_id: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            event_id: event_id.to_string(),
            timestamp: timestamp.to_string(),
            source,
        })
}

fn parse_day(day: &str, event_id: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|source| DbError::DayBucketParse {
        event_id: event_id.to_string(),
        day: day.to_string(),
        source,
    })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

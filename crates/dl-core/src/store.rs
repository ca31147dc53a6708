//! Persistence boundary for the event log.
//!
//! The log never touches a database directly. It is handed something that
//! implements [`EventStore`]: the `SQLite` store in `dl-db`, or the
//! [`MemoryStore`] below for tests and embedding.
//!
//! # Contract
//!
//! - `insert` and `delete` are atomic per event: they either commit durably
//!   or fail with no visible effect.
//! - "Most recent" means greatest `timestamp`; equal timestamps are broken by
//!   insertion order, later insertion first.
//! - Type codes are returned raw. Decoding them is the log's job, so that an
//!   out-of-range code is caught as an invariant violation rather than as a
//!   storage error.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{InvariantViolation, PersistenceError};
use crate::event::EventId;
use crate::event_type::EventType;

/// An event ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub timestamp: DateTime<Utc>,
    pub day_bucket: NaiveDate,
    pub kind: EventType,
    pub note: String,
}

/// An event as read back from storage.
///
/// `day_bucket` is `None` for rows written before the column existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub day_bucket: Option<NaiveDate>,
    pub code: i32,
    pub note: String,
}

impl StoredEvent {
    /// Decodes the stored type code.
    ///
    /// # Panics
    ///
    /// Panics with an [`InvariantViolation`] if the code is unknown.
    pub fn kind(&self) -> EventType {
        EventType::from_code(self.code).unwrap_or_else(|| {
            InvariantViolation::UnknownTypeCode {
                id: self.id.clone(),
                code: self.code,
            }
            .raise()
        })
    }
}

/// Durable, queryable storage of events.
pub trait EventStore {
    /// Persists a new event and returns it with its assigned identity.
    fn insert(&mut self, event: &NewEvent) -> Result<StoredEvent, PersistenceError>;

    /// Removes an event. Fails with [`PersistenceError::NotFound`] if absent.
    fn delete(&mut self, id: &EventId) -> Result<(), PersistenceError>;

    /// Loads a single event.
    fn get(&self, id: &EventId) -> Result<Option<StoredEvent>, PersistenceError>;

    /// The most recent event whose type is one of `kinds`.
    fn latest_of_kinds(&self, kinds: &[EventType])
    -> Result<Option<StoredEvent>, PersistenceError>;

    /// All events, most recent first.
    fn list_newest_first(&self) -> Result<Vec<StoredEvent>, PersistenceError>;

    /// Records the day bucket of an existing event.
    fn set_day_bucket(&mut self, id: &EventId, day: NaiveDate) -> Result<(), PersistenceError>;
}

/// In-memory [`EventStore`].
///
/// Keeps records in insertion order; the sequence number breaks timestamp
/// ties the same way the `SQLite` store's rowid does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<(u64, StoredEvent)>,
    next_seq: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record verbatim, bypassing the log.
    ///
    /// Used to stage legacy or damaged rows.
    pub fn seed(&mut self, record: StoredEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.push((seq, record));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn newest_first(&self) -> impl Iterator<Item = &StoredEvent> {
        let mut ordered: Vec<&(u64, StoredEvent)> = self.records.iter().collect();
        ordered.sort_by(|(a_seq, a), (b_seq, b)| {
            b.timestamp.cmp(&a.timestamp).then_with(|| b_seq.cmp(a_seq))
        });
        ordered.into_iter().map(|(_, record)| record)
    }
}

impl EventStore for MemoryStore {
    fn insert(&mut self, event: &NewEvent) -> Result<StoredEvent, PersistenceError> {
        let record = StoredEvent {
            id: EventId::new(uuid::Uuid::new_v4().to_string()),
            timestamp: event.timestamp,
            day_bucket: Some(event.day_bucket),
            code: event.kind.code(),
            note: event.note.clone(),
        };
        self.seed(record.clone());
        Ok(record)
    }

    fn delete(&mut self, id: &EventId) -> Result<(), PersistenceError> {
        let before = self.records.len();
        self.records.retain(|(_, record)| &record.id != id);
        if self.records.len() == before {
            return Err(PersistenceError::NotFound(id.clone()));
        }
        Ok(())
    }

    fn get(&self, id: &EventId) -> Result<Option<StoredEvent>, PersistenceError> {
        Ok(self
            .records
            .iter()
            .find(|(_, record)| &record.id == id)
            .map(|(_, record)| record.clone()))
    }

    fn latest_of_kinds(
        &self,
        kinds: &[EventType],
    ) -> Result<Option<StoredEvent>, PersistenceError> {
        Ok(self
            .newest_first()
            .find(|record| kinds.iter().any(|kind| kind.code() == record.code))
            .cloned())
    }

    fn list_newest_first(&self) -> Result<Vec<StoredEvent>, PersistenceError> {
        Ok(self.newest_first().cloned().collect())
    }

    fn set_day_bucket(&mut self, id: &EventId, day: NaiveDate) -> Result<(), PersistenceError> {
        let (_, record) = self
            .records
            .iter_mut()
            .find(|(_, record)| &record.id == id)
            .ok_or_else(|| PersistenceError::NotFound(id.clone()))?;
        record.day_bucket = Some(day);
        Ok(())
    }
}

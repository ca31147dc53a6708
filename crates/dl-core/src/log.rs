//! The event log: the only way events are created, loaded and deleted.

use chrono::{DateTime, NaiveDate, Utc};

use crate::calendar::Calendar;
use crate::error::PersistenceError;
use crate::event::{Event, EventId};
use crate::event_type::EventType;
use crate::store::{EventStore, NewEvent, StoredEvent};
use crate::walk::WalkStateResolver;

/// Event log over an explicit store handle.
///
/// Every record that passes through [`EventLog::get`] or [`EventLog::list`]
/// has its day bucket backfilled first, so callers never see an event
/// without one.
#[derive(Debug)]
pub struct EventLog<S> {
    store: S,
    calendar: Calendar,
}

impl<S: EventStore> EventLog<S> {
    pub const fn new(store: S, calendar: Calendar) -> Self {
        Self { store, calendar }
    }

    /// Calendar used for day buckets.
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Walk-state queries against the same store.
    pub fn walk_state(&self) -> WalkStateResolver<'_, S> {
        WalkStateResolver::new(&self.store)
    }

    /// Logs an event of `kind` at the current time.
    pub fn create(&mut self, kind: EventType) -> Result<Event, PersistenceError> {
        self.create_at(kind, Utc::now(), String::new())
    }

    /// Logs an event at an explicit time.
    pub fn create_at(
        &mut self,
        kind: EventType,
        timestamp: DateTime<Utc>,
        note: impl Into<String>,
    ) -> Result<Event, PersistenceError> {
        let new_event = NewEvent {
            timestamp,
            day_bucket: self.calendar.day_of(timestamp),
            kind,
            note: note.into(),
        };
        let stored = self.store.insert(&new_event)?;
        tracing::debug!(id = %stored.id, %kind, %timestamp, "event created");
        Ok(Event {
            id: stored.id,
            timestamp: new_event.timestamp,
            day_bucket: new_event.day_bucket,
            kind,
            note: new_event.note,
        })
    }

    pub fn delete(&mut self, id: &EventId) -> Result<(), PersistenceError> {
        self.store.delete(id)?;
        tracing::debug!(%id, "event deleted");
        Ok(())
    }

    pub fn get(&mut self, id: &EventId) -> Result<Option<Event>, PersistenceError> {
        self.store
            .get(id)?
            .map(|record| self.hydrate(record))
            .transpose()
    }

    /// Fills in a missing day bucket from the timestamp and persists it.
    ///
    /// Returns the bucket. A record that already has one is left untouched:
    /// the bucket is the day in the calendar the event was created under, and
    /// the log cannot tell that apart from a bucket that went stale. Events
    /// are never retimed, so only rows predating the column lack one.
    pub fn backfill_day_bucket(
        &mut self,
        record: &mut StoredEvent,
    ) -> Result<NaiveDate, PersistenceError> {
        if let Some(day) = record.day_bucket {
            return Ok(day);
        }
        let day = self.calendar.day_of(record.timestamp);
        self.store.set_day_bucket(&record.id, day)?;
        record.day_bucket = Some(day);
        tracing::debug!(id = %record.id, %day, "backfilled day bucket");
        Ok(day)
    }

    /// All events grouped by day, most recent first.
    pub fn list(&mut self) -> Result<Timeline, PersistenceError> {
        let records = self.store.list_newest_first()?;
        let events = records
            .into_iter()
            .map(|record| self.hydrate(record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Timeline::new(events))
    }

    fn hydrate(&mut self, mut record: StoredEvent) -> Result<Event, PersistenceError> {
        let kind = record.kind();
        let day_bucket = self.backfill_day_bucket(&mut record)?;
        Ok(Event {
            id: record.id,
            timestamp: record.timestamp,
            day_bucket,
            kind,
            note: record.note,
        })
    }
}

/// Events ordered for display: days most recent first, and events most
/// recent first within a day.
///
/// Grouping is done lazily by [`Timeline::days`], which can be called any
/// number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    events: Vec<Event>,
}

impl Timeline {
    /// Builds a timeline from events already ordered most recent first.
    ///
    /// The stable sort only reorders events whose stored bucket disagrees
    /// with their position, e.g. buckets computed under another offset.
    pub fn new(mut events: Vec<Event>) -> Self {
        events.sort_by(|a, b| b.day_bucket.cmp(&a.day_bucket));
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn days(&self) -> DayGroups<'_> {
        DayGroups {
            rest: &self.events,
        }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = DayGroup<'a>;
    type IntoIter = DayGroups<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

/// Events sharing a day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayGroup<'a> {
    pub day: NaiveDate,
    pub events: &'a [Event],
}

/// Iterator over the day groups of a [`Timeline`].
#[derive(Debug, Clone)]
pub struct DayGroups<'a> {
    rest: &'a [Event],
}

impl<'a> Iterator for DayGroups<'a> {
    type Item = DayGroup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.rest.first()?.day_bucket;
        let len = self
            .rest
            .iter()
            .position(|event| event.day_bucket != day)
            .unwrap_or(self.rest.len());
        let (events, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(DayGroup { day, events })
    }
}

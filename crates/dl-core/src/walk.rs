//! Walk state derived from the event log.
//!
//! There is no stored "walking" flag. Whether a walk is in progress is read
//! off the most recent walk-boundary event each time it is asked:
//! - no boundary event: not walking
//! - latest is `WalkBegin`: walking
//! - latest is `WalkEnd`: not walking
//!
//! Only `EventLog::create` with a boundary type moves the state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{InvariantViolation, PersistenceError};
use crate::event_type::EventType;
use crate::store::EventStore;

/// Quick actions offered while not walking.
const IDLE_ACTIONS: [EventType; 1] = [EventType::WalkBegin];

/// Quick actions offered during a walk, in display order.
const WALKING_ACTIONS: [EventType; 3] = [EventType::Pee, EventType::Poop, EventType::WalkEnd];

/// Whether a walk is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkState {
    #[default]
    Idle,
    Walking,
}

impl WalkState {
    /// State after a boundary event. `None` for non-boundary types.
    pub const fn after(kind: EventType) -> Option<Self> {
        match kind {
            EventType::WalkBegin => Some(Self::Walking),
            EventType::WalkEnd => Some(Self::Idle),
            _ => None,
        }
    }

    pub const fn is_walking(self) -> bool {
        matches!(self, Self::Walking)
    }

    /// Event types to offer as quick actions in this state.
    pub const fn available_actions(self) -> &'static [EventType] {
        match self {
            Self::Idle => &IDLE_ACTIONS,
            Self::Walking => &WALKING_ACTIONS,
        }
    }
}

/// Walk state plus the boundary event it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WalkStatus {
    pub state: WalkState,
    /// Timestamp of the latest boundary event, if any.
    pub since: Option<DateTime<Utc>>,
}

/// Read-only query over a store for the current walk state.
pub struct WalkStateResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: EventStore + ?Sized> WalkStateResolver<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current state and when it began.
    ///
    /// # Panics
    ///
    /// Panics with an [`InvariantViolation`] if the boundary lookup yields a
    /// non-boundary event or an unknown type code.
    pub fn status(&self) -> Result<WalkStatus, PersistenceError> {
        let Some(latest) = self.store.latest_of_kinds(&EventType::WALK_BOUNDARIES)? else {
            return Ok(WalkStatus::default());
        };
        let kind = latest.kind();
        let Some(state) = WalkState::after(kind) else {
            InvariantViolation::NonBoundaryEvent {
                id: latest.id,
                kind,
            }
            .raise()
        };
        Ok(WalkStatus {
            state,
            since: Some(latest.timestamp),
        })
    }

    pub fn state(&self) -> Result<WalkState, PersistenceError> {
        Ok(self.status()?.state)
    }

    pub fn is_walking(&self) -> Result<bool, PersistenceError> {
        Ok(self.state()?.is_walking())
    }

    pub fn available_actions(&self) -> Result<&'static [EventType], PersistenceError> {
        Ok(self.state()?.available_actions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use crate::store::{MemoryStore, NewEvent, StoredEvent};
    use chrono::{NaiveDate, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0).unwrap()
    }

    fn record(store: &mut MemoryStore, kind: EventType, timestamp: DateTime<Utc>) -> StoredEvent {
        store
            .insert(&NewEvent {
                timestamp,
                day_bucket: timestamp.date_naive(),
                kind,
                note: String::new(),
            })
            .unwrap()
    }

    /// Store whose boundary lookup ignores the filter.
    struct UnfilteredStore(MemoryStore);

    impl EventStore for UnfilteredStore {
        fn insert(&mut self, event: &NewEvent) -> Result<StoredEvent, PersistenceError> {
            self.0.insert(event)
        }
        fn delete(&mut self, id: &EventId) -> Result<(), PersistenceError> {
            self.0.delete(id)
        }
        fn get(&self, id: &EventId) -> Result<Option<StoredEvent>, PersistenceError> {
            self.0.get(id)
        }
        fn latest_of_kinds(
            &self,
            _kinds: &[EventType],
        ) -> Result<Option<StoredEvent>, PersistenceError> {
            Ok(self.0.list_newest_first()?.into_iter().next())
        }
        fn list_newest_first(&self) -> Result<Vec<StoredEvent>, PersistenceError> {
            self.0.list_newest_first()
        }
        fn set_day_bucket(
            &mut self,
            id: &EventId,
            day: NaiveDate,
        ) -> Result<(), PersistenceError> {
            self.0.set_day_bucket(id, day)
        }
    }

    /// Store whose reads always fail.
    struct BrokenStore;

    impl EventStore for BrokenStore {
        fn insert(&mut self, _event: &NewEvent) -> Result<StoredEvent, PersistenceError> {
            Err(PersistenceError::backend("disk unavailable"))
        }
        fn delete(&mut self, _id: &EventId) -> Result<(), PersistenceError> {
            Err(PersistenceError::backend("disk unavailable"))
        }
        fn get(&self, _id: &EventId) -> Result<Option<StoredEvent>, PersistenceError> {
            Err(PersistenceError::backend("disk unavailable"))
        }
        fn latest_of_kinds(
            &self,
            _kinds: &[EventType],
        ) -> Result<Option<StoredEvent>, PersistenceError> {
            Err(PersistenceError::backend("disk unavailable"))
        }
        fn list_newest_first(&self) -> Result<Vec<StoredEvent>, PersistenceError> {
            Err(PersistenceError::backend("disk unavailable"))
        }
        fn set_day_bucket(
            &mut self,
            _id: &EventId,
            _day: NaiveDate,
        ) -> Result<(), PersistenceError> {
            Err(PersistenceError::backend("disk unavailable"))
        }
    }

    #[test]
    fn empty_store_is_not_walking() {
        let store = MemoryStore::new();
        let resolver = WalkStateResolver::new(&store);
        assert!(!resolver.is_walking().unwrap());
        assert_eq!(resolver.available_actions().unwrap(), &[EventType::WalkBegin]);
        assert_eq!(resolver.status().unwrap().since, None);
    }

    #[test]
    fn walk_begin_pee_walk_end_scenario() {
        let mut store = MemoryStore::new();

        record(&mut store, EventType::WalkBegin, at(8, 0));
        let resolver = WalkStateResolver::new(&store);
        assert!(resolver.is_walking().unwrap());
        assert_eq!(
            resolver.available_actions().unwrap(),
            &[EventType::Pee, EventType::Poop, EventType::WalkEnd]
        );

        record(&mut store, EventType::Pee, at(8, 10));
        let resolver = WalkStateResolver::new(&store);
        assert!(resolver.is_walking().unwrap());
        assert_eq!(resolver.status().unwrap().since, Some(at(8, 0)));

        record(&mut store, EventType::WalkEnd, at(8, 30));
        let resolver = WalkStateResolver::new(&store);
        assert!(!resolver.is_walking().unwrap());
        assert_eq!(resolver.available_actions().unwrap(), &[EventType::WalkBegin]);
        assert_eq!(resolver.status().unwrap().since, Some(at(8, 30)));
    }

    #[test]
    fn non_boundary_events_do_not_move_state() {
        let mut store = MemoryStore::new();
        for (kind, minute) in [
            (EventType::Meal, 0),
            (EventType::Snack, 5),
            (EventType::Pee, 10),
            (EventType::Poop, 15),
        ] {
            record(&mut store, kind, at(7, minute));
        }
        assert_eq!(
            WalkStateResolver::new(&store).state().unwrap(),
            WalkState::Idle
        );
    }

    #[test]
    fn most_recent_by_timestamp_wins_over_insertion_order() {
        let mut store = MemoryStore::new();
        record(&mut store, EventType::WalkEnd, at(9, 0));
        // Back-dated begin logged afterwards does not reopen the walk.
        record(&mut store, EventType::WalkBegin, at(8, 0));
        assert!(!WalkStateResolver::new(&store).is_walking().unwrap());
    }

    #[test]
    fn equal_timestamps_resolve_to_later_insertion() {
        let mut store = MemoryStore::new();
        record(&mut store, EventType::WalkEnd, at(9, 0));
        record(&mut store, EventType::WalkBegin, at(9, 0));
        assert!(WalkStateResolver::new(&store).is_walking().unwrap());
    }

    #[test]
    fn store_failure_propagates() {
        let resolver = WalkStateResolver::new(&BrokenStore);
        assert!(matches!(
            resolver.is_walking(),
            Err(PersistenceError::Backend(_))
        ));
        assert!(resolver.available_actions().is_err());
    }

    #[test]
    #[should_panic(expected = "returned by walk-boundary lookup")]
    fn non_boundary_lookup_result_is_fatal() {
        let mut store = MemoryStore::new();
        record(&mut store, EventType::Meal, at(12, 0));
        let store = UnfilteredStore(store);
        let _ = WalkStateResolver::new(&store).is_walking();
    }

    #[test]
    fn availability_sets_are_fixed() {
        assert_eq!(WalkState::Idle.available_actions(), &[EventType::WalkBegin]);
        assert_eq!(
            WalkState::Walking.available_actions(),
            &[EventType::Pee, EventType::Poop, EventType::WalkEnd]
        );
        assert_eq!(WalkState::after(EventType::Snack), None);
    }
}

//! Core domain logic for the dog log.
//!
//! This crate contains the fundamental types and logic for:
//! - Event types: the closed, persisted enumeration and its display metadata
//! - The event log: creating, deleting and listing events grouped by day
//! - Walk state: deriving whether a walk is in progress and which quick
//!   actions to offer

pub mod calendar;
pub mod error;
pub mod event;
pub mod event_type;
pub mod log;
pub mod store;
pub mod walk;

pub use calendar::{Calendar, InvalidOffset};
pub use error::{InvariantViolation, PersistenceError};
pub use event::{Event, EventId};
pub use event_type::{EventType, Rgb, UnknownEventType};
pub use log::{DayGroup, DayGroups, EventLog, Timeline};
pub use store::{EventStore, MemoryStore, NewEvent, StoredEvent};
pub use walk::{WalkState, WalkStateResolver, WalkStatus};

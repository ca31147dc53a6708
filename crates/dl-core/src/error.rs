//! Error taxonomy for the event log.

use thiserror::Error;

use crate::event::EventId;
use crate::event_type::EventType;

/// A failure to read, write or delete against the underlying store.
///
/// Surfaced to the caller as-is; the log never retries.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The event to delete or load does not exist.
    #[error("event not found: {0}")]
    NotFound(EventId),
    /// The store backend failed (I/O, schema mismatch, corruption).
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl PersistenceError {
    /// Wraps a backend-specific error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Backend(err.into())
    }
}

/// A defect in stored data or in the log's own logic.
///
/// These are not routed to the user. [`InvariantViolation::raise`] logs and
/// aborts the current operation with a panic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The walk-boundary lookup returned an event of another type.
    #[error("event {id} of type {kind} returned by walk-boundary lookup")]
    NonBoundaryEvent { id: EventId, kind: EventType },
    /// A stored record carries a type code outside the known range.
    #[error("event {id} has unknown type code {code}")]
    UnknownTypeCode { id: EventId, code: i32 },
}

impl InvariantViolation {
    /// Fails fast.
    #[track_caller]
    pub fn raise(self) -> ! {
        tracing::error!(violation = %self, "event log invariant violated");
        panic!("invariant violated: {self}");
    }
}

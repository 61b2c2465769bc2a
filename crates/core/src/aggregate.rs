//! Command/event state machines with optimistic concurrency.

use crate::error::{DomainError, DomainResult};

/// Identity and revision of a piece of tracked state.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Number of events applied so far.
    fn version(&self) -> u64;

    /// Expectation that matches this exact revision.
    fn expect_current(&self) -> ExpectedVersion {
        ExpectedVersion::Exact(self.version())
    }
}

/// Revision a writer expects the stored state to be at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    Any,
    Exact(u64),
}

impl ExpectedVersion {
    /// `Conflict` when the stored revision moved on.
    pub fn check(self, actual: u64) -> DomainResult<()> {
        match self {
            ExpectedVersion::Exact(expected) if expected != actual => Err(DomainError::conflict(
                format!("stale write: expected revision {expected}, found {actual}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Pure decision (`handle`) and evolution (`apply`) over one state value.
///
/// No IO happens here; callers persist the returned events or the new state.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    fn apply(&mut self, event: &Self::Event);

    /// Events `command` produces from the current state. Never mutates.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// `handle` then `apply` every resulting event. State is untouched on error.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}

//! Persistence contract for pack state.
//!
//! The pipeline never owns the database; callers plug in whatever stores
//! their readiness records. [`InMemoryPackStateStore`] serves tests and the
//! command-line tool.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use packforge_core::{Aggregate, AggregateRoot, DomainError, ExpectedVersion, PurchaseOrderId};

use crate::state::{MarkSent, PackCommand, PackState, RecordGenerated, ReserveVersion};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("pack state store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub trait PackStateStore: Send + Sync {
    /// Current state; an order without a stored pack is `NotGenerated`.
    fn load(&self, po_id: PurchaseOrderId) -> Result<PackState, StoreError>;

    /// Claim `version` before rendering so a failed attempt cannot reuse it.
    fn reserve_version(
        &self,
        po_id: PurchaseOrderId,
        version: u32,
        reserved_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError>;

    /// Record a generated pack (`version`, `generated_at`).
    fn save_generated(
        &self,
        po_id: PurchaseOrderId,
        version: u32,
        generated_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError>;

    /// Record that the generated pack reached the manufacturer.
    fn save_sent(
        &self,
        po_id: PurchaseOrderId,
        sent_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError>;
}

impl<S> PackStateStore for Arc<S>
where
    S: PackStateStore + ?Sized,
{
    fn load(&self, po_id: PurchaseOrderId) -> Result<PackState, StoreError> {
        (**self).load(po_id)
    }

    fn reserve_version(
        &self,
        po_id: PurchaseOrderId,
        version: u32,
        reserved_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError> {
        (**self).reserve_version(po_id, version, reserved_at, expected)
    }

    fn save_generated(
        &self,
        po_id: PurchaseOrderId,
        version: u32,
        generated_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError> {
        (**self).save_generated(po_id, version, generated_at, expected)
    }

    fn save_sent(
        &self,
        po_id: PurchaseOrderId,
        sent_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError> {
        (**self).save_sent(po_id, sent_at, expected)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPackStateStore {
    inner: RwLock<HashMap<PurchaseOrderId, PackState>>,
}

impl InMemoryPackStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a state, e.g. one rebuilt from a readiness record.
    pub fn insert(&self, state: PackState) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(*state.id(), state);
        Ok(())
    }

    fn execute(
        &self,
        po_id: PurchaseOrderId,
        expected: ExpectedVersion,
        command: PackCommand,
    ) -> Result<PackState, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let mut state = map
            .get(&po_id)
            .cloned()
            .unwrap_or_else(|| PackState::empty(po_id));

        expected.check(state.version())?;
        state.execute(&command)?;
        map.insert(po_id, state.clone());
        Ok(state)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl PackStateStore for InMemoryPackStateStore {
    fn load(&self, po_id: PurchaseOrderId) -> Result<PackState, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .get(&po_id)
            .cloned()
            .unwrap_or_else(|| PackState::empty(po_id)))
    }

    fn reserve_version(
        &self,
        po_id: PurchaseOrderId,
        version: u32,
        reserved_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError> {
        self.execute(
            po_id,
            expected,
            PackCommand::ReserveVersion(ReserveVersion {
                po_id,
                version,
                occurred_at: reserved_at,
            }),
        )
    }

    fn save_generated(
        &self,
        po_id: PurchaseOrderId,
        version: u32,
        generated_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError> {
        self.execute(
            po_id,
            expected,
            PackCommand::RecordGenerated(RecordGenerated {
                po_id,
                version,
                occurred_at: generated_at,
            }),
        )
    }

    fn save_sent(
        &self,
        po_id: PurchaseOrderId,
        sent_at: DateTime<Utc>,
        expected: ExpectedVersion,
    ) -> Result<PackState, StoreError> {
        self.execute(
            po_id,
            expected,
            PackCommand::MarkSent(MarkSent {
                po_id,
                occurred_at: sent_at,
            }),
        )
    }
}

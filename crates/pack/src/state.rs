//! Pack lifecycle per purchase order: not generated, generated, sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use packforge_core::{
    Aggregate, AggregateRoot, DomainError, Event, PurchaseOrderId, ReadinessRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackStatus {
    NotGenerated,
    Generated,
    Sent,
}

/// Aggregate root: pack state of one purchase order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackState {
    po_id: PurchaseOrderId,
    status: PackStatus,
    pack_version: Option<u32>,
    /// Highest version handed out, including attempts that never finished.
    reserved_version: Option<u32>,
    generated_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    revision: u64,
}

impl PackState {
    /// State of an order that never had a pack.
    pub fn empty(po_id: PurchaseOrderId) -> Self {
        Self {
            po_id,
            status: PackStatus::NotGenerated,
            pack_version: None,
            reserved_version: None,
            generated_at: None,
            sent_at: None,
            revision: 0,
        }
    }

    /// Rebuild from the pack fields stored on a readiness record.
    pub fn from_readiness(record: &ReadinessRecord) -> Self {
        let status = match (record.manufacturer_pack_generated_at, record.manufacturer_pack_sent_at) {
            (None, _) => PackStatus::NotGenerated,
            (Some(_), None) => PackStatus::Generated,
            (Some(_), Some(_)) => PackStatus::Sent,
        };
        Self {
            po_id: record.po_id,
            status,
            pack_version: record.manufacturer_pack_version,
            reserved_version: record.manufacturer_pack_version,
            generated_at: record.manufacturer_pack_generated_at,
            sent_at: record.manufacturer_pack_sent_at,
            revision: 0,
        }
    }

    /// Copy the pack fields onto `record`. The stored version is the latest
    /// one issued, so a failed attempt's number is not handed out again.
    pub fn write_to(&self, record: &mut ReadinessRecord) {
        record.manufacturer_pack_version = self.latest_version();
        record.manufacturer_pack_generated_at = self.generated_at;
        record.manufacturer_pack_sent_at = self.sent_at;
    }

    pub fn status(&self) -> PackStatus {
        self.status
    }

    pub fn pack_version(&self) -> Option<u32> {
        self.pack_version
    }

    /// Highest version issued so far, generated or only reserved.
    pub fn latest_version(&self) -> Option<u32> {
        self.pack_version.max(self.reserved_version)
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }
}

impl AggregateRoot for PackState {
    type Id = PurchaseOrderId;

    fn id(&self) -> &Self::Id {
        &self.po_id
    }

    fn version(&self) -> u64 {
        self.revision
    }
}

/// Command: ReserveVersion. Claims a version before any document is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveVersion {
    pub po_id: PurchaseOrderId,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordGenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordGenerated {
    pub po_id: PurchaseOrderId,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MarkSent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSent {
    pub po_id: PurchaseOrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackCommand {
    ReserveVersion(ReserveVersion),
    RecordGenerated(RecordGenerated),
    MarkSent(MarkSent),
}

/// Event: PackVersionReserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackVersionReserved {
    pub po_id: PurchaseOrderId,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PackGenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackGenerated {
    pub po_id: PurchaseOrderId,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PackSent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSent {
    pub po_id: PurchaseOrderId,
    pub version: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackEvent {
    PackVersionReserved(PackVersionReserved),
    PackGenerated(PackGenerated),
    PackSent(PackSent),
}

impl Event for PackEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PackEvent::PackVersionReserved(_) => "pack.version_reserved",
            PackEvent::PackGenerated(_) => "pack.generated",
            PackEvent::PackSent(_) => "pack.sent",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PackEvent::PackVersionReserved(e) => e.occurred_at,
            PackEvent::PackGenerated(e) => e.occurred_at,
            PackEvent::PackSent(e) => e.occurred_at,
        }
    }
}

impl Aggregate for PackState {
    type Command = PackCommand;
    type Event = PackEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PackEvent::PackVersionReserved(e) => {
                self.reserved_version = self.reserved_version.max(Some(e.version));
            }
            PackEvent::PackGenerated(e) => {
                self.status = PackStatus::Generated;
                self.pack_version = Some(e.version);
                self.reserved_version = self.reserved_version.max(Some(e.version));
                self.generated_at = Some(e.occurred_at);
                // a regenerated pack has not been sent yet
                self.sent_at = None;
            }
            PackEvent::PackSent(e) => {
                self.status = PackStatus::Sent;
                self.sent_at = Some(e.occurred_at);
            }
        }
        self.revision += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PackCommand::ReserveVersion(cmd) => self.handle_reserve(cmd),
            PackCommand::RecordGenerated(cmd) => self.handle_generated(cmd),
            PackCommand::MarkSent(cmd) => self.handle_sent(cmd),
        }
    }
}

impl PackState {
    fn ensure_po(&self, po_id: PurchaseOrderId) -> Result<(), DomainError> {
        if self.po_id != po_id {
            return Err(DomainError::invariant("purchase order mismatch"));
        }
        Ok(())
    }

    /// Versions start at 1 and never go below the last generated one.
    fn ensure_usable_version(&self, version: u32) -> Result<(), DomainError> {
        if version == 0 {
            return Err(DomainError::validation("pack version must be at least 1"));
        }
        match self.pack_version {
            Some(current) if version < current => Err(DomainError::conflict(format!(
                "pack version {version} is older than current version {current}"
            ))),
            _ => Ok(()),
        }
    }

    fn handle_reserve(&self, cmd: &ReserveVersion) -> Result<Vec<PackEvent>, DomainError> {
        self.ensure_po(cmd.po_id)?;
        self.ensure_usable_version(cmd.version)?;

        Ok(vec![PackEvent::PackVersionReserved(PackVersionReserved {
            po_id: cmd.po_id,
            version: cmd.version,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_generated(&self, cmd: &RecordGenerated) -> Result<Vec<PackEvent>, DomainError> {
        self.ensure_po(cmd.po_id)?;
        self.ensure_usable_version(cmd.version)?;

        Ok(vec![PackEvent::PackGenerated(PackGenerated {
            po_id: cmd.po_id,
            version: cmd.version,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_sent(&self, cmd: &MarkSent) -> Result<Vec<PackEvent>, DomainError> {
        self.ensure_po(cmd.po_id)?;
        let version = match (self.status, self.pack_version) {
            (PackStatus::Generated, Some(version)) => version,
            (PackStatus::Sent, _) => {
                return Err(DomainError::invariant("pack has already been marked as sent"));
            }
            _ => {
                return Err(DomainError::invariant(
                    "pack must be generated before it can be marked as sent",
                ));
            }
        };

        Ok(vec![PackEvent::PackSent(PackSent {
            po_id: cmd.po_id,
            version,
            occurred_at: cmd.occurred_at,
        })])
    }
}

//! `packforge-core`: domain records shared by the manufacturer pack pipeline.
//!
//! This crate contains **pure domain** types (no rendering, no persistence).
//! Purchase orders, identifiers and readiness records are owned by the calling
//! workflow; the pipeline only reads them.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod event;
pub mod id;
pub mod identifiers;
pub mod order;
pub mod party;
pub mod readiness;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use document::{DocumentKind, GeneratedDocument, PackSelection};
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{ProjectId, PurchaseOrderId};
pub use identifiers::{GtinType, ProductIdentifiers};
pub use order::{LineItem, PurchaseOrder, ShippingMetadata};
pub use party::{Address, Party};
pub use readiness::{CartonDimensions, ReadinessRecord};
pub use value_object::ValueObject;

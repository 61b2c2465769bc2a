//! Validate, version, assemble, record and deliver a manufacturer pack.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use packforge_core::{AggregateRoot, ExpectedVersion, PackSelection, PurchaseOrderId};
use packforge_documents::DocumentBundle;
use packforge_labels::LabelConfiguration;
use packforge_readiness::{PackValidation, validate_pack};

use crate::archive::PackArchive;
use crate::assembler::PackAssembler;
use crate::error::{PackError, PackResult};
use crate::state::PackState;
use crate::store::{PackStateStore, StoreError};
use crate::upload::{Delivery, PackUploader};
use crate::version::next_version;

/// One pack generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    #[serde(flatten)]
    pub bundle: DocumentBundle,
    #[serde(default = "PackSelection::all")]
    pub selection: PackSelection,
    /// Label run to print instead of the stored one.
    #[serde(default)]
    pub labels: Option<LabelConfiguration>,
    /// Regenerate under this version instead of the next one.
    #[serde(default)]
    pub version: Option<u32>,
}

impl PackRequest {
    pub fn new(bundle: DocumentBundle, selection: PackSelection) -> Self {
        Self {
            bundle,
            selection,
            labels: None,
            version: None,
        }
    }

    fn po_id(&self) -> PurchaseOrderId {
        self.bundle.order.id
    }
}

#[derive(Debug, Clone)]
pub struct PackOutcome {
    pub archive: PackArchive,
    pub version: u32,
    /// Non-blocking validation findings.
    pub warnings: Vec<String>,
    pub delivery: Delivery,
    /// Whether the new version was recorded. The archive is valid either way.
    pub persisted: bool,
}

pub struct PackService<S> {
    assembler: PackAssembler,
    store: S,
    uploader: Option<Arc<dyn PackUploader>>,
}

impl<S> PackService<S>
where
    S: PackStateStore,
{
    pub fn new(assembler: PackAssembler, store: S) -> Self {
        Self {
            assembler,
            store,
            uploader: None,
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn PackUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn validate(&self, request: &PackRequest) -> PackValidation {
        let bundle = &request.bundle;
        validate_pack(
            &bundle.order,
            bundle.identifiers.as_ref(),
            bundle.readiness.as_ref(),
            &request.selection,
        )
    }

    pub fn generate(&self, request: &PackRequest) -> PackResult<PackOutcome> {
        let po_number = request.bundle.order.po_number.as_str();
        let po_id = request.po_id();

        let validation = self.validate(request);
        if !validation.valid {
            tracing::info!(po_number, errors = ?validation.errors, "pack validation failed");
            return Err(PackError::Validation {
                errors: validation.errors,
            });
        }

        let current = match self.store.load(po_id) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(po_number, error = %err, "could not load pack state; using readiness record");
                None
            }
        };
        let recorded = request
            .bundle
            .readiness
            .as_ref()
            .and_then(|r| r.manufacturer_pack_version);
        let previous = current
            .as_ref()
            .and_then(PackState::latest_version)
            .max(recorded);
        let version = next_version(previous, request.version);

        // claimed before rendering: a failed attempt still consumes the number
        let expected = current
            .as_ref()
            .map_or(ExpectedVersion::Any, PackState::expect_current);
        let expected = match self.store.reserve_version(po_id, version, Utc::now(), expected) {
            Ok(state) => state.expect_current(),
            Err(err) => {
                tracing::error!(po_number, version, error = %err, "failed to reserve pack version");
                ExpectedVersion::Any
            }
        };

        let archive = self.assembler.assemble(
            &request.bundle,
            &request.selection,
            request.labels.as_ref(),
            version,
        )?;

        let persisted = match self.store.save_generated(po_id, version, Utc::now(), expected) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(po_number, version, error = %err, "failed to record pack version");
                false
            }
        };

        let delivery = self.deliver(po_id, &archive);

        Ok(PackOutcome {
            archive,
            version,
            warnings: validation.warnings,
            delivery,
            persisted,
        })
    }

    fn deliver(&self, po_id: PurchaseOrderId, archive: &PackArchive) -> Delivery {
        let Some(uploader) = &self.uploader else {
            return Delivery::Local;
        };
        match uploader.upload(po_id, archive) {
            Ok(location) => {
                tracing::info!(archive = %archive.file_name, %location, "pack uploaded");
                Delivery::Uploaded { location }
            }
            Err(err) => {
                tracing::warn!(archive = %archive.file_name, error = %err, "upload failed; deliver locally");
                Delivery::Local
            }
        }
    }

    /// Record that the generated pack was sent to the manufacturer.
    pub fn mark_sent(&self, po_id: PurchaseOrderId) -> Result<PackState, StoreError> {
        let state = self.store.save_sent(po_id, Utc::now(), ExpectedVersion::Any)?;
        tracing::info!(%po_id, version = ?state.pack_version(), "pack marked as sent");
        Ok(state)
    }
}

//! Hand-off of a finished pack to external storage.

use serde::Serialize;
use thiserror::Error;

use packforge_core::PurchaseOrderId;

use crate::archive::PackArchive;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload target unreachable: {0}")]
    Unreachable(String),
}

/// External storage that accepts finished packs.
pub trait PackUploader: Send + Sync {
    /// Store the archive and return where it can be fetched.
    fn upload(&self, po_id: PurchaseOrderId, archive: &PackArchive) -> Result<String, UploadError>;
}

/// Where the caller finds the pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
    /// Stored remotely at `location`.
    Uploaded { location: String },
    /// Only the returned bytes; save or download them locally.
    Local,
}

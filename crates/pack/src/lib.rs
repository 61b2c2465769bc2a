//! Manufacturer pack assembly.
//!
//! [`PackService::generate`] runs the whole pipeline for one purchase order:
//! pre-flight validation, version numbering, rendering of the selected
//! documents, zipping, recording the new pack state and optional upload.

pub mod archive;
pub mod assembler;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod store;
pub mod upload;
pub mod version;

pub use archive::{PackArchive, write_archive};
pub use assembler::{PackAssembler, label_content};
pub use config::PackConfig;
pub use error::{GenerationError, PackError, PackResult};
pub use service::{PackOutcome, PackRequest, PackService};
pub use state::{PackCommand, PackEvent, PackState, PackStatus};
pub use store::{InMemoryPackStateStore, PackStateStore, StoreError};
pub use upload::{Delivery, PackUploader, UploadError};
pub use version::{archive_file_name, document_file_name, next_version, version_suffix};

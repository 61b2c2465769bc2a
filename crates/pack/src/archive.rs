//! Zip container for the generated documents.

use std::io::{Cursor, Write};

use serde::Serialize;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use packforge_core::GeneratedDocument;

use crate::error::PackResult;

/// A finished manufacturer pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackArchive {
    pub file_name: String,
    /// Pack version stamped on every file name.
    pub version: u32,
    /// Entry names in archive order.
    pub entries: Vec<String>,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Zip `documents` in the given order.
///
/// Entry timestamps are left at the zip epoch, so identical documents give
/// identical archives.
pub fn write_archive(documents: &[GeneratedDocument]) -> PackResult<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for document in documents {
        writer.start_file(document.file_name.as_str(), options)?;
        writer.write_all(&document.bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

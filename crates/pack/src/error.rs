use thiserror::Error;

use packforge_core::DocumentKind;
use packforge_documents::DocumentError;
use packforge_labels::LabelError;

/// Why a single document could not be produced.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Labels(#[from] LabelError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Error)]
pub enum PackError {
    /// The pre-flight check found blocking problems; every one is listed.
    #[error("pack validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("failed to generate {kind}: {source}")]
    Generation {
        kind: DocumentKind,
        #[source]
        source: GenerationError,
    },

    #[error("failed to write pack archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PackError {
    pub(crate) fn generation(kind: DocumentKind, source: impl Into<GenerationError>) -> Self {
        Self::Generation {
            kind,
            source: source.into(),
        }
    }
}

pub type PackResult<T> = Result<T, PackError>;

use thiserror::Error;

/// Failure while turning drawn pages into bytes.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document has no pages")]
    Empty,

    #[error("pdf encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

use thiserror::Error;

use packforge_render::RenderError;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("readiness record is required")]
    MissingReadiness,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("carton labels fit 1 or 2 per page, got {0}")]
    LabelsPerPage(u8),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

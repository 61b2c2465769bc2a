use thiserror::Error;

use packforge_render::RenderError;

pub use crate::code128::BarcodeError;

/// Failures that stop a label run.
///
/// Barcode encoding problems are not listed here: a cell whose payload cannot
/// be encoded falls back to plain text and the run continues.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("no identifier available to print on labels")]
    MissingPayload,

    #[error("label quantity must be greater than 0")]
    EmptyRun,

    #[error("unknown label template: {0}")]
    UnknownTemplate(String),

    #[error("calibration offset {axis} = {value} mm is out of range (max {max} mm)")]
    OffsetOutOfRange {
        axis: &'static str,
        value: f64,
        max: f64,
    },

    #[error("printer density must be greater than 0 dpi")]
    InvalidDensity,

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type LabelResult<T> = Result<T, LabelError>;

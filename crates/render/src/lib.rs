//! Drawing surfaces for print documents.
//!
//! Renderers draw through [`DrawingSurface`] in millimetres with a top-left
//! origin. [`RecordingSurface`] keeps the operations in memory (tests, page
//! post-processing); [`PdfSurface`] serialises them into a PDF.

pub mod error;
pub mod geometry;
pub mod pdf;
pub mod surface;
pub mod text;

pub use error::RenderError;
pub use geometry::{PageSize, Point, Rect, mm_to_pt, pt_to_mm};
pub use pdf::PdfSurface;
pub use surface::{Align, Color, DrawOp, DrawingSurface, Paint, RecordedPage, RecordingSurface, Stroke, TextStyle};
pub use text::{fit_text, text_width_mm, wrap_text};

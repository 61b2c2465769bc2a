//! Identification labels: sheet geometry, Code 128 symbols, PDF label runs
//! and ZPL output for thermal printers.
//!
//! Placement is pure arithmetic ([`sheet::place_labels`]); drawing goes
//! through [`packforge_render::DrawingSurface`] so the same run can be
//! inspected in memory or written to PDF.

pub mod code128;
pub mod config;
pub mod error;
pub mod render;
pub mod sheet;
pub mod thermal;

pub use code128::{BarcodeError, Code128, CodeSet};
pub use config::LabelConfiguration;
pub use error::{LabelError, LabelResult};
pub use render::{LabelContent, LabelRunSummary, draw_labels, draw_test_sheet, render_labels_pdf};
pub use sheet::{CalibrationOffset, LabelTemplate, Placement, SHEET_3X10, SheetGeometry, place_labels};
pub use thermal::{BASELINE_DPI, thermal_labels};

//! Per-run label options.

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, LabelResult};
use crate::sheet::{CalibrationOffset, LabelTemplate};

/// Largest accepted calibration shift on either axis.
pub const MAX_OFFSET_MM: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelConfiguration {
    pub template: LabelTemplate,
    pub quantity: u32,
    pub include_sku: bool,
    pub include_name: bool,
    pub offset_x_mm: f64,
    pub offset_y_mm: f64,
    /// Print alignment guides instead of label content.
    pub test_print: bool,
}

impl Default for LabelConfiguration {
    fn default() -> Self {
        Self {
            template: LabelTemplate::default(),
            quantity: 30,
            include_sku: true,
            include_name: true,
            offset_x_mm: 0.0,
            offset_y_mm: 0.0,
            test_print: false,
        }
    }
}

impl LabelConfiguration {
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_template(mut self, template: LabelTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_offset(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.offset_x_mm = x_mm;
        self.offset_y_mm = y_mm;
        self
    }

    pub fn offset(&self) -> CalibrationOffset {
        CalibrationOffset::new(self.offset_x_mm, self.offset_y_mm)
    }

    /// Reject settings that cannot produce a usable run.
    pub fn validate(&self) -> LabelResult<()> {
        if self.quantity == 0 && !self.test_print {
            return Err(LabelError::EmptyRun);
        }
        check_offset("x", self.offset_x_mm)?;
        check_offset("y", self.offset_y_mm)
    }
}

fn check_offset(axis: &'static str, value: f64) -> LabelResult<()> {
    if value.is_finite() && value.abs() <= MAX_OFFSET_MM {
        Ok(())
    } else {
        Err(LabelError::OffsetOutOfRange {
            axis,
            value,
            max: MAX_OFFSET_MM,
        })
    }
}

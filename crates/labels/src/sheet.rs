//! Physical label stock and slot placement.
//!
//! Slots are numbered row-major from the top-left of each page. A run that
//! exceeds one page continues on the next page at slot 0.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use packforge_render::{PageSize, Rect};

use crate::error::LabelError;

/// Fixed geometry of a multi-up label sheet, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    pub label_width: f64,
    pub label_height: f64,
    pub margin_top: f64,
    pub margin_left: f64,
    pub gutter_x: f64,
    pub gutter_y: f64,
    pub columns: usize,
    pub rows: usize,
}

/// 3 × 10 sheet of 63.5 × 38.1 mm labels.
pub const SHEET_3X10: SheetGeometry = SheetGeometry {
    label_width: 63.5,
    label_height: 38.1,
    margin_top: 4.76,
    margin_left: 3.18,
    gutter_x: 2.54,
    gutter_y: 2.54,
    columns: 3,
    rows: 10,
};

/// Single 40 × 30 mm label, centred on an A4 page.
pub const SINGLE_LABEL_WIDTH: f64 = 40.0;
pub const SINGLE_LABEL_HEIGHT: f64 = 30.0;

impl SheetGeometry {
    pub fn per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Page the grid is printed on: A4 width, and tall enough for every row
    /// with a bottom margin equal to the top margin.
    pub fn page_size(&self) -> PageSize {
        let grid_height = self.rows as f64 * self.label_height
            + (self.rows.saturating_sub(1)) as f64 * self.gutter_y;
        let height = (2.0 * self.margin_top + grid_height).max(PageSize::A4.height_mm);
        PageSize::new(PageSize::A4.width_mm, height)
    }

    /// Cell rectangle for a slot on a page, before calibration.
    pub fn cell(&self, column: usize, row: usize) -> Rect {
        Rect::new(
            self.margin_left + column as f64 * (self.label_width + self.gutter_x),
            self.margin_top + row as f64 * (self.label_height + self.gutter_y),
            self.label_width,
            self.label_height,
        )
    }
}

/// Label stock selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelTemplate {
    /// Multi-up sheet, 30 labels per page.
    #[default]
    #[serde(rename = "sheet_3x10", alias = "sheet", alias = "multi")]
    Sheet3x10,
    /// One 40 × 30 mm label per page.
    #[serde(rename = "single_40x30", alias = "single")]
    Single40x30,
}

impl LabelTemplate {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelTemplate::Sheet3x10 => "sheet_3x10",
            LabelTemplate::Single40x30 => "single_40x30",
        }
    }

    pub fn labels_per_page(self) -> usize {
        match self {
            LabelTemplate::Sheet3x10 => SHEET_3X10.per_page(),
            LabelTemplate::Single40x30 => 1,
        }
    }

    pub fn page_size(self) -> PageSize {
        match self {
            LabelTemplate::Sheet3x10 => SHEET_3X10.page_size(),
            LabelTemplate::Single40x30 => PageSize::A4,
        }
    }

    pub fn label_size(self) -> (f64, f64) {
        match self {
            LabelTemplate::Sheet3x10 => (SHEET_3X10.label_width, SHEET_3X10.label_height),
            LabelTemplate::Single40x30 => (SINGLE_LABEL_WIDTH, SINGLE_LABEL_HEIGHT),
        }
    }

    pub fn pages_for(self, count: usize) -> usize {
        count.div_ceil(self.labels_per_page())
    }
}

impl FromStr for LabelTemplate {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheet_3x10" | "sheet" | "multi" => Ok(LabelTemplate::Sheet3x10),
            "single_40x30" | "single" => Ok(LabelTemplate::Single40x30),
            other => Err(LabelError::UnknownTemplate(other.to_string())),
        }
    }
}

impl core::fmt::Display for LabelTemplate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Printer skew compensation applied uniformly to every cell.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalibrationOffset {
    pub x_mm: f64,
    pub y_mm: f64,
}

impl CalibrationOffset {
    pub fn new(x_mm: f64, y_mm: f64) -> Self {
        Self { x_mm, y_mm }
    }
}

/// Where one label lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Zero-based page index.
    pub page: usize,
    /// Zero-based slot on the page (row-major).
    pub slot: usize,
    pub column: usize,
    pub row: usize,
    pub rect: Rect,
}

/// Place `count` labels of `template`, applying `offset` to every cell.
pub fn place_labels(
    template: LabelTemplate,
    count: usize,
    offset: CalibrationOffset,
) -> Vec<Placement> {
    (0..count)
        .map(|index| place_one(template, index, offset))
        .collect()
}

fn place_one(template: LabelTemplate, index: usize, offset: CalibrationOffset) -> Placement {
    match template {
        LabelTemplate::Sheet3x10 => {
            let geometry = SHEET_3X10;
            let page = index / geometry.per_page();
            let slot = index % geometry.per_page();
            let column = slot % geometry.columns;
            let row = slot / geometry.columns;
            let cell = geometry.cell(column, row);
            Placement {
                page,
                slot,
                column,
                row,
                rect: Rect::new(
                    cell.x + offset.x_mm,
                    cell.y + offset.y_mm,
                    cell.width,
                    cell.height,
                ),
            }
        }
        LabelTemplate::Single40x30 => {
            let page = PageSize::A4;
            Placement {
                page: index,
                slot: 0,
                column: 0,
                row: 0,
                rect: Rect::new(
                    (page.width_mm - SINGLE_LABEL_WIDTH) / 2.0 + offset.x_mm,
                    (page.height_mm - SINGLE_LABEL_HEIGHT) / 2.0 + offset.y_mm,
                    SINGLE_LABEL_WIDTH,
                    SINGLE_LABEL_HEIGHT,
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn first_cell_sits_at_the_margins() {
        let p = place_labels(LabelTemplate::Sheet3x10, 1, CalibrationOffset::default());
        assert_eq!(p[0].rect, Rect::new(3.18, 4.76, 63.5, 38.1));
    }

    #[test]
    fn cell_offsets_add_size_and_gutter_per_step() {
        let p = place_labels(LabelTemplate::Sheet3x10, 5, CalibrationOffset::default());
        // index 4 -> column 1, row 1
        assert_eq!((p[4].column, p[4].row), (1, 1));
        assert!((p[4].rect.x - (3.18 + 63.5 + 2.54)).abs() < 1e-9);
        assert!((p[4].rect.y - (4.76 + 38.1 + 2.54)).abs() < 1e-9);
    }

    #[test]
    fn label_31_starts_a_new_sheet_at_slot_zero() {
        let p = place_labels(LabelTemplate::Sheet3x10, 31, CalibrationOffset::default());
        assert_eq!(p[29].page, 0);
        assert_eq!((p[29].column, p[29].row), (2, 9));
        assert_eq!(p[30].page, 1);
        assert_eq!(p[30].slot, 0);
        assert_eq!(p[30].rect, p[0].rect);
        assert_eq!(LabelTemplate::Sheet3x10.pages_for(31), 2);
    }

    #[test]
    fn calibration_shifts_every_cell_uniformly() {
        let base = place_labels(LabelTemplate::Sheet3x10, 30, CalibrationOffset::default());
        let shifted = place_labels(LabelTemplate::Sheet3x10, 30, CalibrationOffset::new(0.8, -0.5));
        for (a, b) in base.iter().zip(&shifted) {
            assert!((b.rect.x - a.rect.x - 0.8).abs() < 1e-9);
            assert!((b.rect.y - a.rect.y + 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn single_label_is_centred_on_a4() {
        let p = place_labels(LabelTemplate::Single40x30, 3, CalibrationOffset::new(1.0, 2.0));
        assert_eq!(p.len(), 3);
        assert_eq!(p[2].page, 2);
        assert_eq!(p[0].rect, Rect::new(86.0, 135.5, 40.0, 30.0));
    }

    #[test]
    fn grid_fits_on_its_page() {
        let page = SHEET_3X10.page_size();
        let bounds = Rect::new(0.0, 0.0, page.width_mm, page.height_mm);
        for p in place_labels(LabelTemplate::Sheet3x10, 30, CalibrationOffset::default()) {
            assert!(bounds.contains(&p.rect), "{:?} outside page", p.rect);
        }
    }

    #[test]
    fn template_parses_from_stored_names() {
        assert_eq!("sheet_3x10".parse::<LabelTemplate>().unwrap(), LabelTemplate::Sheet3x10);
        assert_eq!(" Single ".parse::<LabelTemplate>().unwrap(), LabelTemplate::Single40x30);
        assert!("avery".parse::<LabelTemplate>().is_err());
    }

    #[test]
    fn serde_names_match_stored_names() {
        for template in [LabelTemplate::Sheet3x10, LabelTemplate::Single40x30] {
            let json = serde_json::to_string(&template).unwrap();
            assert_eq!(json, format!("\"{}\"", template.as_str()));
            assert_eq!(serde_json::from_str::<LabelTemplate>(&json).unwrap(), template);
        }
        assert_eq!(
            serde_json::from_str::<LabelTemplate>("\"single\"").unwrap(),
            LabelTemplate::Single40x30
        );
        assert_eq!(
            serde_json::from_str::<LabelTemplate>("\"multi\"").unwrap(),
            LabelTemplate::Sheet3x10
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: up to one sheet of labels maps to unique, non-overlapping
        /// cells on the first page.
        #[test]
        fn one_sheet_of_labels_never_collides(count in 0usize..=30) {
            let placements = place_labels(LabelTemplate::Sheet3x10, count, CalibrationOffset::default());
            let cells: HashSet<(usize, usize)> =
                placements.iter().map(|p| (p.column, p.row)).collect();
            prop_assert_eq!(cells.len(), count);
            prop_assert!(placements.iter().all(|p| p.page == 0));

            for (i, a) in placements.iter().enumerate() {
                for b in &placements[i + 1..] {
                    prop_assert!(!a.rect.overlaps(&b.rect));
                }
            }
        }

        /// Property: slot index is the label index modulo sheet capacity.
        #[test]
        fn slots_wrap_per_page(count in 1usize..200) {
            let placements = place_labels(LabelTemplate::Sheet3x10, count, CalibrationOffset::default());
            for (index, p) in placements.iter().enumerate() {
                prop_assert_eq!(p.page, index / 30);
                prop_assert_eq!(p.slot, index % 30);
                prop_assert_eq!(p.column + p.row * 3, p.slot);
            }
        }
    }
}

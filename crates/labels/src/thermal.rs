//! ZPL output for direct thermal printers.
//!
//! Every requested label becomes its own `^XA ... ^XZ` block so a printer can
//! start on any copy. Coordinates are laid out for a 203 dpi head and scaled
//! to the target density.

use std::fmt::Write as _;

use crate::config::LabelConfiguration;
use crate::error::{LabelError, LabelResult};
use crate::render::LabelContent;

pub const BASELINE_DPI: u32 = 203;
const DOTS_PER_MM_AT_BASELINE: f64 = 8.0;

/// Positions at the baseline density, in dots.
const LEFT: f64 = 16.0;
const PRIMARY_TOP: f64 = 12.0;
const PRIMARY_HEIGHT: f64 = 28.0;
const SECONDARY_HEIGHT: f64 = 20.0;
const LINE_GAP: f64 = 4.0;
const BARCODE_HEIGHT: f64 = 90.0;
const MODULE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
struct Scale {
    factor: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Scale {
    fn new(dpi: u32, config: &LabelConfiguration) -> LabelResult<Self> {
        if dpi == 0 {
            return Err(LabelError::InvalidDensity);
        }
        let factor = f64::from(dpi) / f64::from(BASELINE_DPI);
        let dots_per_mm = DOTS_PER_MM_AT_BASELINE * factor;
        Ok(Self {
            factor,
            offset_x: config.offset_x_mm * dots_per_mm,
            offset_y: config.offset_y_mm * dots_per_mm,
        })
    }

    fn size(&self, dots: f64) -> u32 {
        (dots * self.factor).round().max(1.0) as u32
    }

    fn x(&self, dots: f64) -> u32 {
        (dots * self.factor + self.offset_x).round().max(0.0) as u32
    }

    fn y(&self, dots: f64) -> u32 {
        (dots * self.factor + self.offset_y).round().max(0.0) as u32
    }

    fn mm(&self, mm: f64) -> u32 {
        self.size(mm * DOTS_PER_MM_AT_BASELINE)
    }
}

/// Field data with `^`, `~`, `_` and non-ASCII bytes hex-escaped for `^FH_`.
fn field_data(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if (byte.is_ascii_graphic() && !matches!(byte, b'^' | b'~' | b'_')) || byte == b' ' {
            out.push(byte as char);
        } else {
            let _ = write!(out, "_{byte:02X}");
        }
    }
    out
}

fn text_field(out: &mut String, scale: &Scale, top: f64, height: f64, text: &str) {
    let _ = writeln!(
        out,
        "^FO{},{}^A0N,{},{}^FH_^FD{}^FS",
        scale.x(LEFT),
        scale.y(top),
        scale.size(height),
        scale.size(height),
        field_data(text)
    );
}

/// One ZPL block per requested label, concatenated.
pub fn thermal_labels(
    content: &LabelContent,
    config: &LabelConfiguration,
    dpi: u32,
) -> LabelResult<String> {
    config.validate()?;
    let scale = Scale::new(dpi, config)?;
    if config.test_print {
        return Ok(alignment_block(config, &scale));
    }

    let mut block = header(config, &scale);
    let mut top = PRIMARY_TOP;
    text_field(&mut block, &scale, top, PRIMARY_HEIGHT, &content.payload);
    top += PRIMARY_HEIGHT + LINE_GAP;

    let secondary = [
        content.sku.as_deref().filter(|_| config.include_sku),
        content.name.as_deref().filter(|_| config.include_name),
    ];
    for line in secondary.into_iter().flatten() {
        text_field(&mut block, &scale, top, SECONDARY_HEIGHT, line);
        top += SECONDARY_HEIGHT + LINE_GAP;
    }

    let _ = writeln!(
        block,
        "^FO{},{}^BY{}^BCN,{},N,N,N^FH_^FD{}^FS\n^XZ",
        scale.x(LEFT),
        scale.y(top),
        scale.size(MODULE_WIDTH).min(10),
        scale.size(BARCODE_HEIGHT),
        field_data(&content.payload)
    );

    let copies = config.quantity as usize;
    tracing::debug!(copies, dpi, "thermal label stream built");
    Ok(block.repeat(copies))
}

fn header(config: &LabelConfiguration, scale: &Scale) -> String {
    let (width_mm, height_mm) = config.template.label_size();
    format!(
        "^XA\n^CI28\n^PW{}\n^LL{}\n",
        scale.mm(width_mm),
        scale.mm(height_mm)
    )
}

/// Frame and centre cross for lining up the first label on the roll.
fn alignment_block(config: &LabelConfiguration, scale: &Scale) -> String {
    let (width_mm, height_mm) = config.template.label_size();
    let width = width_mm * DOTS_PER_MM_AT_BASELINE;
    let height = height_mm * DOTS_PER_MM_AT_BASELINE;
    let arm = 24.0;
    let mut block = header(config, scale);
    let _ = writeln!(
        block,
        "^FO{},{}^GB{},{},2^FS",
        scale.x(0.0),
        scale.y(0.0),
        scale.size(width),
        scale.size(height)
    );
    let _ = writeln!(
        block,
        "^FO{},{}^GB{},2,2^FS",
        scale.x(width / 2.0 - arm),
        scale.y(height / 2.0),
        scale.size(2.0 * arm)
    );
    let _ = writeln!(
        block,
        "^FO{},{}^GB2,{},2^FS",
        scale.x(width / 2.0),
        scale.y(height / 2.0 - arm),
        scale.size(2.0 * arm)
    );
    text_field(
        &mut block,
        scale,
        PRIMARY_TOP,
        SECONDARY_HEIGHT,
        &format!("x {:.2} mm / y {:.2} mm", config.offset_x_mm, config.offset_y_mm),
    );
    block.push_str("^XZ\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::LabelTemplate;

    fn content() -> LabelContent {
        LabelContent {
            payload: "X001ABCDEF".to_string(),
            sku: Some("MUG-BLUE".to_string()),
            name: Some("Ceramic mug".to_string()),
        }
    }

    fn config(quantity: u32) -> LabelConfiguration {
        LabelConfiguration::default()
            .with_template(LabelTemplate::Single40x30)
            .with_quantity(quantity)
    }

    #[test]
    fn one_block_per_copy() {
        let zpl = thermal_labels(&content(), &config(3), BASELINE_DPI).unwrap();
        assert_eq!(zpl.matches("^XA").count(), 3);
        assert_eq!(zpl.matches("^XZ").count(), 3);
        assert_eq!(zpl.matches("^BCN").count(), 3);
        assert!(zpl.contains("^PW320\n^LL240"));
        assert!(zpl.contains("^FO16,12^A0N,28,28^FH_^FDX001ABCDEF^FS"));
    }

    #[test]
    fn density_scales_every_coordinate() {
        let zpl = thermal_labels(&content(), &config(1), 406).unwrap();
        assert!(zpl.contains("^PW640\n^LL480"));
        assert!(zpl.contains("^FO32,24^A0N,56,56"));
        assert!(zpl.contains("^BY4^BCN,180"));
    }

    #[test]
    fn toggles_remove_fields() {
        let with_all = thermal_labels(&content(), &config(1), BASELINE_DPI).unwrap();
        assert!(with_all.contains("MUG-BLUE"));
        assert!(with_all.contains("Ceramic mug"));

        let bare = LabelConfiguration {
            include_sku: false,
            include_name: false,
            ..config(1)
        };
        let zpl = thermal_labels(&content(), &bare, BASELINE_DPI).unwrap();
        assert!(!zpl.contains("MUG-BLUE"));
        assert!(!zpl.contains("Ceramic"));
        assert_eq!(zpl.matches("^A0N").count(), 1);
    }

    #[test]
    fn offsets_shift_fields_in_dots() {
        let shifted = config(1).with_offset(1.0, -1.0);
        let zpl = thermal_labels(&content(), &shifted, BASELINE_DPI).unwrap();
        assert!(zpl.contains("^FO24,4^A0N,28,28"));
    }

    #[test]
    fn control_characters_are_hex_escaped() {
        assert_eq!(field_data("A^B~C_D"), "A_5EB_7EC_5FD");
        assert_eq!(field_data("Caf\u{e9}"), "Caf_C3_A9");
        assert_eq!(field_data("two words"), "two words");
    }

    #[test]
    fn zero_density_is_rejected() {
        assert!(matches!(
            thermal_labels(&content(), &config(1), 0),
            Err(LabelError::InvalidDensity)
        ));
    }

    #[test]
    fn test_print_emits_a_single_alignment_block() {
        let cfg = LabelConfiguration {
            test_print: true,
            ..config(5)
        };
        let zpl = thermal_labels(&content(), &cfg, BASELINE_DPI).unwrap();
        assert_eq!(zpl.matches("^XA").count(), 1);
        assert_eq!(zpl.matches("^GB").count(), 3);
        assert!(!zpl.contains("X001ABCDEF"));
    }
}

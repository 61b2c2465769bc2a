//! Drawing label runs onto a surface.

use serde::Serialize;

use packforge_core::ProductIdentifiers;
use packforge_render::{
    Align, Color, DrawingSurface, Paint, PdfSurface, Point, Rect, Stroke, TextStyle, fit_text,
};

use crate::code128::Code128;
use crate::config::LabelConfiguration;
use crate::error::{LabelError, LabelResult};
use crate::sheet::{LabelTemplate, Placement, place_labels};

/// Code128 requires ten modules of white space on each side.
const QUIET_ZONE_MODULES: usize = 10;
/// Narrowest bar most thermal and laser printers reproduce reliably.
const MIN_MODULE_MM: f64 = 0.19;
const MIN_BAR_HEIGHT_MM: f64 = 5.0;
const LINE_GAP_MM: f64 = 0.6;

/// Text printed on every label of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelContent {
    /// Printed first and encoded in the barcode.
    pub payload: String,
    pub sku: Option<String>,
    pub name: Option<String>,
}

impl LabelContent {
    /// Pick the printed identifier (FNSKU, GTIN or SKU) from `identifiers`.
    pub fn from_identifiers(
        identifiers: &ProductIdentifiers,
        needs_fnsku: bool,
        product_name: Option<&str>,
    ) -> LabelResult<Self> {
        let payload = identifiers
            .label_payload(needs_fnsku)
            .ok_or(LabelError::MissingPayload)?;
        Ok(Self {
            payload: payload.to_string(),
            sku: identifiers.sku().map(str::to_string),
            name: product_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

/// What a label run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRunSummary {
    pub pages: usize,
    pub labels: usize,
    /// Cells that printed the payload as text because no barcode fit.
    pub barcode_fallbacks: usize,
}

struct CellStyle {
    padding: f64,
    primary: TextStyle,
    secondary: TextStyle,
}

impl CellStyle {
    fn for_template(template: LabelTemplate) -> Self {
        match template {
            LabelTemplate::Sheet3x10 => Self {
                padding: 2.0,
                primary: TextStyle::bold(9.0).aligned(Align::Center),
                secondary: TextStyle::regular(7.0).aligned(Align::Center),
            },
            LabelTemplate::Single40x30 => Self {
                padding: 1.5,
                primary: TextStyle::bold(8.0).aligned(Align::Center),
                secondary: TextStyle::regular(6.0).aligned(Align::Center),
            },
        }
    }
}

/// Draw `config.quantity` labels, or one calibration sheet in test-print mode.
pub fn draw_labels(
    surface: &mut dyn DrawingSurface,
    content: &LabelContent,
    config: &LabelConfiguration,
) -> LabelResult<LabelRunSummary> {
    config.validate()?;
    if config.test_print {
        return Ok(draw_test_sheet(surface, config));
    }

    // Encoding depends only on the payload, so do it once for the run.
    let symbol = match Code128::encode(&content.payload) {
        Ok(symbol) => Some(symbol),
        Err(err) => {
            tracing::warn!(payload = %content.payload, error = %err, "barcode encoding failed, printing text");
            None
        }
    };

    let placements = place_labels(config.template, config.quantity as usize, config.offset());
    let style = CellStyle::for_template(config.template);
    let mut summary = LabelRunSummary::default();

    for placement in &placements {
        start_page_if_needed(surface, config.template, placement, &mut summary);
        surface.rect(
            placement.rect,
            Paint::Stroke(Stroke::solid(Color::LIGHT_GREY, 0.1)),
        );
        if !draw_cell(surface, placement.rect, content, config, &style, symbol.as_ref()) {
            summary.barcode_fallbacks += 1;
        }
        summary.labels += 1;
    }

    if summary.barcode_fallbacks > 0 && symbol.is_some() {
        tracing::warn!(
            fallbacks = summary.barcode_fallbacks,
            "barcode did not fit the label, printed as text"
        );
    }
    tracing::debug!(
        pages = summary.pages,
        labels = summary.labels,
        template = %config.template,
        "label run drawn"
    );
    Ok(summary)
}

fn start_page_if_needed(
    surface: &mut dyn DrawingSurface,
    template: LabelTemplate,
    placement: &Placement,
    summary: &mut LabelRunSummary,
) {
    if placement.page + 1 > summary.pages {
        surface.begin_page(template.page_size());
        summary.pages = placement.page + 1;
    }
}

/// Returns `false` when the barcode fell back to text.
fn draw_cell(
    surface: &mut dyn DrawingSurface,
    cell: Rect,
    content: &LabelContent,
    config: &LabelConfiguration,
    style: &CellStyle,
    symbol: Option<&Code128>,
) -> bool {
    let inner = cell.inset(style.padding);
    let center_x = inner.center().x;
    let mut cursor = inner.y;

    let primary = fit_text(&content.payload, inner.width, &style.primary);
    cursor += style.primary.ascent_mm();
    surface.text(center_x, cursor, &primary, &style.primary);
    cursor += style.primary.line_height_mm() - style.primary.ascent_mm();

    let secondary_lines = [
        content.sku.as_deref().filter(|_| config.include_sku),
        content.name.as_deref().filter(|_| config.include_name),
    ];
    for line in secondary_lines.into_iter().flatten() {
        let fitted = fit_text(line, inner.width, &style.secondary);
        cursor += style.secondary.ascent_mm();
        surface.text(center_x, cursor, &fitted, &style.secondary);
        cursor += style.secondary.line_height_mm() - style.secondary.ascent_mm();
    }

    let remaining = Rect::new(
        inner.x,
        cursor + LINE_GAP_MM,
        inner.width,
        (inner.bottom() - cursor - LINE_GAP_MM).max(0.0),
    );

    match symbol.and_then(|s| barcode_area(remaining, s).map(|area| (s, area))) {
        Some((symbol, area)) => {
            surface.bars(area, &symbol.modules());
            true
        }
        None => {
            draw_text_fallback(surface, remaining, &content.payload, &style.primary);
            false
        }
    }
}

/// Area the bars occupy inside `space`, or `None` if the symbol cannot be
/// printed at a scannable size.
fn barcode_area(space: Rect, symbol: &Code128) -> Option<Rect> {
    let modules = symbol.modules().len();
    let module_mm = space.width / (modules + 2 * QUIET_ZONE_MODULES) as f64;
    if module_mm < MIN_MODULE_MM || space.height < MIN_BAR_HEIGHT_MM {
        return None;
    }
    let width = module_mm * modules as f64;
    Some(Rect::new(
        space.x + (space.width - width) / 2.0,
        space.y,
        width,
        space.height,
    ))
}

fn draw_text_fallback(surface: &mut dyn DrawingSurface, space: Rect, payload: &str, style: &TextStyle) {
    let fitted = fit_text(payload, space.width, style);
    let baseline = space.y + (space.height + style.ascent_mm()) / 2.0;
    surface.text(space.center().x, baseline.min(space.bottom()), &fitted, style);
}

/// One full sheet of guide rectangles, centre crosshairs and row/column tags.
pub fn draw_test_sheet(surface: &mut dyn DrawingSurface, config: &LabelConfiguration) -> LabelRunSummary {
    let template = config.template;
    let placements = place_labels(template, template.labels_per_page(), config.offset());
    let page = template.page_size();
    let guide = Stroke::dashed(Color::GUIDE, 0.25);
    let tag_style = TextStyle::bold(7.0).with_color(Color::GUIDE);
    let arm = 3.0;

    surface.begin_page(page);
    for placement in &placements {
        let rect = placement.rect;
        let center = rect.center();
        surface.rect(rect, Paint::Stroke(guide));
        surface.line(
            Point::new(center.x - arm, center.y),
            Point::new(center.x + arm, center.y),
            Stroke::solid(Color::GUIDE, 0.15),
        );
        surface.line(
            Point::new(center.x, center.y - arm),
            Point::new(center.x, center.y + arm),
            Stroke::solid(Color::GUIDE, 0.15),
        );
        surface.text(
            rect.x + 1.5,
            rect.y + 1.5 + tag_style.ascent_mm(),
            &format!("R{} C{}", placement.row + 1, placement.column + 1),
            &tag_style,
        );
    }

    let note = format!(
        "Alignment test {} | offset x {:.2} mm, y {:.2} mm",
        template, config.offset_x_mm, config.offset_y_mm
    );
    surface.text(
        page.width_mm / 2.0,
        page.height_mm - 1.2,
        &note,
        &TextStyle::regular(6.0)
            .with_color(Color::GREY)
            .aligned(Align::Center),
    );

    tracing::info!(template = %template, cells = placements.len(), "alignment test sheet drawn");
    LabelRunSummary {
        pages: 1,
        labels: placements.len(),
        barcode_fallbacks: 0,
    }
}

/// Render a label run straight to PDF bytes.
pub fn render_labels_pdf(
    content: &LabelContent,
    config: &LabelConfiguration,
) -> LabelResult<(Vec<u8>, LabelRunSummary)> {
    let mut surface = PdfSurface::with_title(format!("Labels {}", content.payload));
    let summary = draw_labels(&mut surface, content, config)?;
    let bytes = surface.finish()?;
    Ok((bytes, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use packforge_core::GtinType;
    use packforge_render::{DrawOp, RecordingSurface};

    fn content() -> LabelContent {
        LabelContent {
            payload: "X001ABCDEF".to_string(),
            sku: Some("MUG-BLUE".to_string()),
            name: Some("Ceramic mug, blue glaze".to_string()),
        }
    }

    fn filled_rects(surface: &RecordingSurface, page: usize) -> Vec<Rect> {
        surface.pages()[page]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect {
                    rect,
                    paint: Paint::Fill(_),
                } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn payload_follows_fnsku_requirement() {
        let ids = ProductIdentifiers {
            gtin_code: Some("4006381333931".to_string()),
            gtin_type: Some(GtinType::Ean13),
            fnsku: Some("X001ABCDEF".to_string()),
            sku: Some("MUG-BLUE".to_string()),
            ..Default::default()
        };
        assert_eq!(
            LabelContent::from_identifiers(&ids, true, None).unwrap().payload,
            "X001ABCDEF"
        );
        assert_eq!(
            LabelContent::from_identifiers(&ids, false, Some("  ")).unwrap(),
            LabelContent {
                payload: "4006381333931".to_string(),
                sku: Some("MUG-BLUE".to_string()),
                name: None,
            }
        );

        let no_fnsku = ProductIdentifiers {
            fnsku: None,
            ..ids
        };
        assert!(matches!(
            LabelContent::from_identifiers(&no_fnsku, true, None),
            Err(LabelError::MissingPayload)
        ));
    }

    #[test]
    fn thirty_one_labels_use_two_pages() {
        let mut surface = RecordingSurface::new();
        let config = LabelConfiguration::default().with_quantity(31);
        let summary = draw_labels(&mut surface, &content(), &config).unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.labels, 31);
        assert_eq!(summary.barcode_fallbacks, 0);
        assert_eq!(surface.page_count(), 2);
        assert_eq!(
            surface.pages()[0].texts().filter(|t| *t == "X001ABCDEF").count(),
            30
        );
        assert_eq!(
            surface.pages()[1].texts().filter(|t| *t == "X001ABCDEF").count(),
            1
        );
    }

    #[test]
    fn bars_stay_inside_their_cell() {
        let mut surface = RecordingSurface::new();
        let config = LabelConfiguration::default().with_quantity(3);
        draw_labels(&mut surface, &content(), &config).unwrap();

        let cells = place_labels(LabelTemplate::Sheet3x10, 3, config.offset());
        let bars = filled_rects(&surface, 0);
        assert!(!bars.is_empty());
        for bar in bars {
            assert!(
                cells.iter().any(|c| c.rect.inset(1.0).contains(&bar)),
                "{bar:?} escapes its cell"
            );
        }
    }

    #[test]
    fn toggles_drop_secondary_lines() {
        let mut surface = RecordingSurface::new();
        let config = LabelConfiguration {
            include_sku: false,
            include_name: false,
            ..LabelConfiguration::default().with_quantity(1)
        };
        draw_labels(&mut surface, &content(), &config).unwrap();
        assert_eq!(surface.all_texts(), vec!["X001ABCDEF"]);
    }

    #[test]
    fn unencodable_payload_prints_as_text() {
        let mut surface = RecordingSurface::new();
        let content = LabelContent {
            payload: "CAF\u{c9}-01".to_string(),
            sku: None,
            name: None,
        };
        let summary = draw_labels(
            &mut surface,
            &content,
            &LabelConfiguration::default().with_quantity(2),
        )
        .unwrap();

        assert_eq!(summary.barcode_fallbacks, 2);
        assert!(filled_rects(&surface, 0).is_empty());
        // header line plus fallback line per label
        assert_eq!(surface.all_texts().iter().filter(|t| t.contains("CAF")).count(), 4);
    }

    #[test]
    fn oversized_payload_falls_back_on_small_labels() {
        let mut surface = RecordingSurface::new();
        let content = LabelContent {
            payload: "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghij".to_string(),
            sku: None,
            name: None,
        };
        let config = LabelConfiguration::default()
            .with_template(LabelTemplate::Single40x30)
            .with_quantity(1);
        let summary = draw_labels(&mut surface, &content, &config).unwrap();
        assert_eq!(summary.barcode_fallbacks, 1);
    }

    #[test]
    fn test_print_draws_guides_for_every_cell() {
        let mut surface = RecordingSurface::new();
        let config = LabelConfiguration {
            test_print: true,
            ..LabelConfiguration::default().with_offset(0.5, -0.25)
        };
        let summary = draw_labels(&mut surface, &content(), &config).unwrap();

        assert_eq!(summary.labels, 30);
        assert_eq!(surface.page_count(), 1);
        let page = &surface.pages()[0];
        assert!(page.contains_text("R1 C1"));
        assert!(page.contains_text("R10 C3"));
        assert!(page.contains_text("offset x 0.50 mm, y -0.25 mm"));
        assert!(!page.contains_text("X001ABCDEF"));

        let guides = page
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { paint: Paint::Stroke(s), .. } if s.dashed))
            .count();
        let crosshairs = page.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
        assert_eq!(guides, 30);
        assert_eq!(crosshairs, 60);
    }

    #[test]
    fn single_mode_puts_one_label_per_page() {
        let mut surface = RecordingSurface::new();
        let config = LabelConfiguration::default()
            .with_template(LabelTemplate::Single40x30)
            .with_quantity(3);
        let summary = draw_labels(&mut surface, &content(), &config).unwrap();
        assert_eq!(summary.pages, 3);
        assert_eq!(surface.page_count(), 3);
    }

    #[test]
    fn pdf_output_has_a_page_per_sheet() {
        let config = LabelConfiguration::default().with_quantity(45);
        let (bytes, summary) = render_labels_pdf(&content(), &config).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(summary.pages, 2);
    }
}

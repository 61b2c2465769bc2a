//! Outer carton labels, one per physical carton.

use packforge_render::{
    Align, Color, DrawingSurface, PageSize, Paint, PdfSurface, Point, Rect, Stroke, TextStyle,
    fit_text,
};

use crate::bundle::DocumentBundle;
use crate::error::{DocumentError, DocumentResult};
use crate::format;

const PAGE_MARGIN_MM: f64 = 10.0;
const GAP_MM: f64 = 10.0;
const PADDING_MM: f64 = 8.0;

/// Label rectangle for carton `index` (0-based) at `per_page` labels a page.
fn label_rect(index: usize, per_page: usize) -> (usize, Rect) {
    let page = PageSize::A4;
    let width = page.width_mm - 2.0 * PAGE_MARGIN_MM;
    let usable = page.height_mm - 2.0 * PAGE_MARGIN_MM;
    let height = (usable - GAP_MM * (per_page - 1) as f64) / per_page as f64;
    let slot = index % per_page;
    (
        index / per_page,
        Rect::new(
            PAGE_MARGIN_MM,
            PAGE_MARGIN_MM + slot as f64 * (height + GAP_MM),
            width,
            height,
        ),
    )
}

/// Fields printed on every carton of the order.
struct CartonFacts {
    company: String,
    po_number: String,
    sku: Option<String>,
    units: Option<String>,
    dimensions: Option<String>,
    weight: Option<String>,
    shipping_mark: Option<String>,
    footnote: String,
}

impl CartonFacts {
    fn rows(&self) -> Vec<(&'static str, &str)> {
        let mut rows = vec![("PO number", self.po_number.as_str())];
        let optional = [
            ("SKU", &self.sku),
            ("Units per carton", &self.units),
            ("Dimensions", &self.dimensions),
            ("Gross weight", &self.weight),
            ("Shipping mark", &self.shipping_mark),
        ];
        rows.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.as_deref().map(|v| (label, v))),
        );
        rows
    }
}

/// Draw one label per carton, `per_page` (1 or 2) to a page.
pub fn compose_carton_labels(
    bundle: &DocumentBundle,
    per_page: u8,
    surface: &mut dyn DrawingSurface,
) -> DocumentResult<usize> {
    if !(1..=2).contains(&per_page) {
        return Err(DocumentError::LabelsPerPage(per_page));
    }
    let readiness = bundle.readiness()?;
    let cartons = readiness
        .cartons_count()
        .ok_or(DocumentError::MissingField("cartons count"))?;

    let facts = CartonFacts {
        company: bundle.company.name.trim().to_string(),
        po_number: bundle.order.po_number.clone(),
        sku: bundle.sku().map(str::to_string),
        units: readiness.units_per_carton().map(format::quantity),
        dimensions: readiness.carton_dimensions().map(|d| format::dimensions_cm(&d)),
        weight: readiness.carton_weight_kg().map(format::weight_kg),
        shipping_mark: bundle
            .order
            .shipping
            .shipping_mark
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        footnote: format!("Generated {}", format::date(bundle.generated_on)),
    };

    let per_page = usize::from(per_page);
    let total = usize::try_from(cartons).unwrap_or(0);
    let mut current_page = None;

    for index in 0..total {
        let (page, rect) = label_rect(index, per_page);
        if current_page != Some(page) {
            surface.begin_page(PageSize::A4);
            current_page = Some(page);
        }
        draw_label(surface, rect, &facts, index + 1, total);

        let last_on_page = (index + 1) % per_page == 0 || index + 1 == total;
        if per_page == 2 && !last_on_page {
            let cut_y = rect.bottom() + GAP_MM / 2.0;
            surface.line(
                Point::new(PAGE_MARGIN_MM, cut_y),
                Point::new(rect.right(), cut_y),
                Stroke::dashed(Color::GREY, 0.2),
            );
        }
    }

    tracing::debug!(
        po_number = %bundle.order.po_number,
        cartons = total,
        pages = surface.page_count(),
        "carton labels composed"
    );
    Ok(total)
}

fn draw_label(surface: &mut dyn DrawingSurface, rect: Rect, facts: &CartonFacts, number: usize, total: usize) {
    surface.rect(rect, Paint::Stroke(Stroke::solid(Color::BLACK, 0.5)));
    let inner = rect.inset(PADDING_MM);

    let company_style = TextStyle::bold(18.0);
    let mut cursor = inner.y + company_style.ascent_mm();
    surface.text(
        inner.x,
        cursor,
        &fit_text(&facts.company, inner.width, &company_style),
        &company_style,
    );
    cursor += 3.0;
    surface.line(
        Point::new(inner.x, cursor),
        Point::new(inner.right(), cursor),
        Stroke::solid(Color::BLACK, 0.4),
    );
    cursor += 3.0;

    let label_style = TextStyle::bold(11.0);
    let value_style = TextStyle::regular(11.0);
    let label_width = 42.0;
    for (label, value) in facts.rows() {
        cursor += label_style.line_height_mm();
        surface.text(inner.x, cursor, label, &label_style);
        surface.text(
            inner.x + label_width,
            cursor,
            &fit_text(value, inner.width - label_width, &value_style),
            &value_style,
        );
    }

    let footnote_style = TextStyle::regular(7.0).with_color(Color::GREY);
    let footnote_baseline = inner.bottom();

    let count_style = TextStyle::bold(26.0).aligned(Align::Center);
    let count_space_top = cursor + 2.0;
    let count_space_bottom = footnote_baseline - footnote_style.line_height_mm();
    let count_baseline =
        (count_space_top + count_space_bottom + count_style.ascent_mm()) / 2.0;
    surface.text(
        inner.center().x,
        count_baseline,
        &format!("CARTON {number} OF {total}"),
        &count_style,
    );

    surface.text(inner.x, footnote_baseline, &facts.footnote, &footnote_style);
}

pub fn render_carton_labels(bundle: &DocumentBundle, per_page: u8) -> DocumentResult<Vec<u8>> {
    let mut pdf = PdfSurface::with_title(format!("Carton Labels {}", bundle.order.po_number));
    compose_carton_labels(bundle, per_page, &mut pdf)?;
    Ok(pdf.finish()?)
}

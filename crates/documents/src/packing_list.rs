//! Packing list: what ships, and how it is packed.

use packforge_core::{PurchaseOrder, ReadinessRecord};
use packforge_render::{Align, DrawingSurface, PdfSurface};

use crate::bundle::DocumentBundle;
use crate::composer::{Column, PageComposer};
use crate::error::DocumentResult;
use crate::format;

const ITEM_COLUMNS: [Column; 5] = [
    Column::new("#", 0.5, Align::Right),
    Column::new("Ref", 1.8, Align::Left),
    Column::new("Description", 5.0, Align::Left),
    Column::new("Qty", 1.2, Align::Right),
    Column::new("Unit", 1.0, Align::Left),
];

pub fn compose_packing_list(bundle: &DocumentBundle, surface: &mut dyn DrawingSurface) -> DocumentResult<()> {
    let order = &bundle.order;
    let mut page = PageComposer::new();

    let generated = format!("Generated {}", format::date(bundle.generated_on));
    page.banner("PACKING LIST", Some(&generated));
    page.fields(&summary_fields(bundle));

    page.heading("Items");
    page.table(&ITEM_COLUMNS, &item_rows(order), &[total_row(order)]);

    if let Some(readiness) = bundle.readiness.as_ref() {
        let packaging = packaging_fields(readiness);
        if !packaging.is_empty() {
            page.heading("Packaging information");
            page.fields(&packaging);
        }
    }

    if let Some(mark) = order
        .shipping
        .shipping_mark
        .as_deref()
        .filter(|m| !m.trim().is_empty())
    {
        page.heading("Shipping mark");
        page.paragraph(mark);
    }

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        page.heading("Notes");
        page.paragraph(notes);
    }

    let pages = page.page_count();
    page.finish(surface, &format!("Packing list {}", order.po_number));
    tracing::debug!(po_number = %order.po_number, pages, "packing list composed");
    Ok(())
}

pub fn render_packing_list(bundle: &DocumentBundle) -> DocumentResult<Vec<u8>> {
    let mut pdf = PdfSurface::with_title(format!("Packing List {}", bundle.order.po_number));
    compose_packing_list(bundle, &mut pdf)?;
    Ok(pdf.finish()?)
}

fn summary_fields(bundle: &DocumentBundle) -> Vec<(&'static str, String)> {
    let order = &bundle.order;
    let mut fields = vec![("PO number", order.po_number.clone())];
    if let Some(project) = order.project_name.as_deref().filter(|p| !p.trim().is_empty()) {
        fields.push(("Project", project.trim().to_string()));
    }
    if let Some(supplier) = bundle.supplier_name() {
        fields.push(("Supplier", supplier.to_string()));
    }
    let company = bundle.company.name.trim();
    if !company.is_empty() {
        fields.push(("Consignee", company.to_string()));
    }
    if let Some(sku) = bundle.sku() {
        fields.push(("SKU", sku.to_string()));
    }
    fields
}

fn item_rows(order: &PurchaseOrder) -> Vec<Vec<String>> {
    order
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            vec![
                (idx + 1).to_string(),
                item.reference.clone(),
                item.description.clone(),
                format::quantity(item.quantity),
                item.unit.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

fn total_row(order: &PurchaseOrder) -> Vec<String> {
    vec![
        String::new(),
        String::new(),
        "Total quantity".to_string(),
        format::quantity(order.total_quantity()),
        String::new(),
    ]
}

fn packaging_fields(readiness: &ReadinessRecord) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(units) = readiness.units_per_carton() {
        fields.push(("Units per carton", format::quantity(units)));
    }
    if let Some(cartons) = readiness.cartons_count() {
        fields.push(("Number of cartons", format::quantity(cartons)));
    }
    if let Some(dims) = readiness.carton_dimensions() {
        fields.push(("Carton dimensions", format::dimensions_cm(&dims)));
    }
    if let Some(weight) = readiness.carton_weight_kg() {
        fields.push(("Carton weight", format::weight_kg(weight)));
    }
    if let Some(total) = readiness.total_units() {
        fields.push(("Total units", format::quantity(total)));
    }
    if let Some(total) = readiness.total_weight_kg() {
        fields.push(("Total weight", format::weight_kg(total)));
    }
    if let (Some(dims), Some(cartons)) = (readiness.carton_dimensions(), readiness.cartons_count()) {
        fields.push(("Total volume", format::volume_cbm(dims.volume_cbm() * cartons as f64)));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bundle;
    use packforge_render::RecordingSurface;

    fn texts(bundle: &DocumentBundle) -> Vec<String> {
        let mut surface = RecordingSurface::new();
        compose_packing_list(bundle, &mut surface).unwrap();
        surface.all_texts().into_iter().map(str::to_string).collect()
    }

    #[test]
    fn derives_totals_from_carton_facts() {
        let texts = texts(&bundle());
        // 10 cartons x 24 units, 10 x 5.5 kg, 10 x 0.009 m3
        assert!(texts.contains(&"240".to_string()));
        assert!(texts.contains(&"55.00 kg".to_string()));
        assert!(texts.contains(&"0.090 m\u{b3}".to_string()));
        assert!(texts.contains(&"Generated 2024-05-02".to_string()));
        assert!(texts.contains(&"Shenzhen Ceramics Co.".to_string()));
    }

    #[test]
    fn totals_need_both_operands() {
        let mut data = bundle();
        if let Some(readiness) = data.readiness.as_mut() {
            readiness.carton_weight_kg = None;
            readiness.units_per_carton = Some(0);
        }
        let texts = texts(&data);
        assert!(!texts.contains(&"Total weight".to_string()));
        assert!(!texts.contains(&"Total units".to_string()));
        assert!(texts.contains(&"Number of cartons".to_string()));
    }

    #[test]
    fn notes_section_only_when_present() {
        let mut data = bundle();
        assert!(!texts(&data).contains(&"Notes".to_string()));

        data.order.notes = Some("Pack mugs in individual white boxes.".to_string());
        let texts = texts(&data);
        assert!(texts.contains(&"Notes".to_string()));
        assert!(texts.iter().any(|t| t.contains("individual white boxes")));
    }

    #[test]
    fn packing_list_without_readiness_still_renders() {
        let mut data = bundle();
        data.readiness = None;
        let texts = texts(&data);
        assert!(!texts.contains(&"Packaging information".to_string()));
        assert!(texts.contains(&"Page 1 of 1".to_string()));
    }
}

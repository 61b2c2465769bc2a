//! Purchase order sheet sent to the manufacturer.

use packforge_core::{PurchaseOrder, ReadinessRecord};
use packforge_render::{Align, DrawingSurface, PdfSurface};

use crate::bundle::{DocumentBundle, party_lines};
use crate::composer::{Column, PageComposer};
use crate::error::DocumentResult;
use crate::format;

const ITEM_COLUMNS: [Column; 7] = [
    Column::new("#", 0.5, Align::Right),
    Column::new("Ref", 1.6, Align::Left),
    Column::new("Description", 4.0, Align::Left),
    Column::new("Qty", 1.1, Align::Right),
    Column::new("Unit", 0.9, Align::Left),
    Column::new("Unit price", 1.4, Align::Right),
    Column::new("Total", 1.6, Align::Right),
];

/// Lay the order sheet out onto `surface`.
pub fn compose_order_sheet(bundle: &DocumentBundle, surface: &mut dyn DrawingSurface) -> DocumentResult<()> {
    let order = &bundle.order;
    let mut page = PageComposer::new();

    page.banner("PURCHASE ORDER", Some(&order.po_number));
    page.fields(&summary_fields(bundle));

    let buyer = party_lines(&bundle.company);
    let supplier = bundle.supplier.as_ref().map(party_lines).unwrap_or_default();
    page.columns(("Buyer", &buyer), ("Supplier", &supplier));

    if let Some(address) = order.delivery_address.as_ref().filter(|a| !a.is_empty()) {
        page.heading("Delivery address");
        page.lines(&address.lines());
    }

    let terms = commercial_terms(order);
    if !terms.is_empty() {
        page.heading("Commercial terms");
        page.fields(&terms);
    }

    page.heading("Line items");
    page.table(&ITEM_COLUMNS, &item_rows(order), &[grand_total_row(order)]);

    let shipping = shipping_fields(order, bundle.readiness.as_ref());
    if !shipping.is_empty() {
        page.heading("Shipping specifications");
        page.fields(&shipping);
    }

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        page.heading("Notes");
        page.paragraph(notes);
    }

    page.spacer(6.0);
    page.signatures(&["Buyer signature", "Supplier signature"]);

    let pages = page.page_count();
    page.finish(surface, &format!("Purchase order {}", order.po_number));
    tracing::debug!(po_number = %order.po_number, pages, "order sheet composed");
    Ok(())
}

pub fn render_order_sheet(bundle: &DocumentBundle) -> DocumentResult<Vec<u8>> {
    let mut pdf = PdfSurface::with_title(format!("Purchase Order {}", bundle.order.po_number));
    compose_order_sheet(bundle, &mut pdf)?;
    Ok(pdf.finish()?)
}

fn summary_fields(bundle: &DocumentBundle) -> Vec<(&'static str, String)> {
    let order = &bundle.order;
    let mut fields = vec![("PO number", order.po_number.clone())];
    if let Some(date) = order.order_date {
        fields.push(("Order date", format::date(date)));
    }
    if let Some(project) = order.project_name.as_deref().filter(|p| !p.trim().is_empty()) {
        fields.push(("Project", project.trim().to_string()));
    }
    fields.push(("Currency", order.currency.clone()));
    if let Some(sku) = bundle.sku() {
        fields.push(("SKU", sku.to_string()));
    }
    fields
}

fn commercial_terms(order: &PurchaseOrder) -> Vec<(&'static str, String)> {
    let mut terms = Vec::new();
    if let Some(payment) = order.payment_terms.as_deref().filter(|p| !p.trim().is_empty()) {
        terms.push(("Payment terms", payment.trim().to_string()));
    }
    if let Some(incoterm) = order.incoterm_display() {
        terms.push(("Incoterm", incoterm));
    }
    if let Some(days) = order.production_lead_time_days {
        terms.push(("Production lead time", format::days(days)));
    }
    if let Some(days) = order.shipping_lead_time_days {
        terms.push(("Shipping lead time", format::days(days)));
    }
    if let Some(date) = order.quote_valid_until {
        terms.push(("Quote valid until", format::date(date)));
    }
    terms
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
                format::unit_price(item.unit_price),
                format::money(item.total()),
            ]
        })
        .collect()
}

fn grand_total_row(order: &PurchaseOrder) -> Vec<String> {
    vec![
        String::new(),
        String::new(),
        "Grand total".to_string(),
        format::quantity(order.total_quantity()),
        String::new(),
        String::new(),
        format::money_with_currency(order.grand_total(), &order.currency),
    ]
}

fn shipping_fields(order: &PurchaseOrder, readiness: Option<&ReadinessRecord>) -> Vec<(&'static str, String)> {
    let shipping = &order.shipping;
    let mut fields = Vec::new();

    let cartons = readiness
        .and_then(ReadinessRecord::cartons_count)
        .or(shipping.carton_count);
    if let Some(cartons) = cartons {
        fields.push(("Cartons", format::quantity(cartons)));
    }
    if let Some(units) = readiness.and_then(ReadinessRecord::units_per_carton) {
        fields.push(("Units per carton", format::quantity(units)));
    }
    if let Some(dims) = readiness.and_then(ReadinessRecord::carton_dimensions) {
        fields.push(("Carton dimensions", format::dimensions_cm(&dims)));
    }
    if let Some(weight) = readiness.and_then(ReadinessRecord::carton_weight_kg) {
        fields.push(("Carton weight", format::weight_kg(weight)));
    }
    if let Some(weight) = shipping.gross_weight_kg {
        fields.push(("Gross weight", format::weight_kg(weight)));
    }
    if let Some(weight) = shipping.net_weight_kg {
        fields.push(("Net weight", format::weight_kg(weight)));
    }
    if let Some(volume) = shipping.volume_cbm {
        fields.push(("Volume", format::volume_cbm(volume)));
    }
    if let Some(mark) = shipping.shipping_mark.as_deref().filter(|m| !m.trim().is_empty()) {
        fields.push(("Shipping mark", mark.trim().to_string()));
    }
    fields
}

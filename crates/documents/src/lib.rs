//! Print documents for the manufacturer pack: order sheet, packing list and
//! carton labels.
//!
//! Each renderer has a `compose_*` function drawing onto any
//! [`packforge_render::DrawingSurface`] and a `render_*` shortcut producing
//! PDF bytes.

pub mod bundle;
pub mod carton_label;
pub mod composer;
pub mod error;
pub mod format;
pub mod order_sheet;
pub mod packing_list;

pub use bundle::DocumentBundle;
pub use carton_label::{compose_carton_labels, render_carton_labels};
pub use composer::{Column, PageComposer};
pub use error::{DocumentError, DocumentResult};
pub use order_sheet::{compose_order_sheet, render_order_sheet};
pub use packing_list::{compose_packing_list, render_packing_list};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, Utc};
    use packforge_core::{
        Address, GtinType, LineItem, Party, ProductIdentifiers, PurchaseOrder, PurchaseOrderId,
        ReadinessRecord, ShippingMetadata,
    };

    use crate::DocumentBundle;

    pub fn bundle() -> DocumentBundle {
        let id = PurchaseOrderId::new();
        DocumentBundle {
            order: PurchaseOrder {
                id,
                po_number: "PO-2024-017".to_string(),
                project_name: Some("Ceramic Mug".to_string()),
                currency: "USD".to_string(),
                order_date: NaiveDate::from_ymd_opt(2024, 4, 28),
                incoterm: Some("FOB".to_string()),
                incoterm_location: Some("Shenzhen".to_string()),
                payment_terms: Some("30% deposit, 70% before shipment".to_string()),
                production_lead_time_days: Some(35),
                shipping_lead_time_days: Some(28),
                quote_valid_until: NaiveDate::from_ymd_opt(2024, 6, 30),
                items: vec![
                    LineItem {
                        reference: "MUG-BLUE".to_string(),
                        description: "Ceramic mug, blue glaze".to_string(),
                        quantity: 240,
                        unit: Some("pcs".to_string()),
                        unit_price: 1.875,
                    },
                    LineItem {
                        reference: "SAUCER".to_string(),
                        description: "Matching saucer".to_string(),
                        quantity: 60,
                        unit: Some("pcs".to_string()),
                        unit_price: 0.333,
                    },
                ],
                delivery_address: Some(Address {
                    line1: "1 Warehouse Way".to_string(),
                    city: Some("Reno".to_string()),
                    postal_code: Some("89502".to_string()),
                    country: Some("US".to_string()),
                    ..Default::default()
                }),
                shipping: ShippingMetadata::default(),
                notes: None,
            },
            company: Party {
                name: "Acme Housewares".to_string(),
                contact_name: Some("Dana Ruiz".to_string()),
                email: Some("buying@acme.test".to_string()),
                ..Default::default()
            },
            supplier: Some(Party {
                name: "Shenzhen Ceramics Co.".to_string(),
                tax_id: Some("91440300MA5F".to_string()),
                ..Default::default()
            }),
            identifiers: Some(ProductIdentifiers {
                gtin_code: Some("4006381333931".to_string()),
                gtin_type: Some(GtinType::Ean13),
                fnsku: Some("X001ABCDEF".to_string()),
                sku: Some("MUG-BLUE".to_string()),
                ..Default::default()
            }),
            readiness: Some(ReadinessRecord {
                units_per_carton: Some(24),
                cartons_count: Some(10),
                carton_length_cm: Some(30.0),
                carton_width_cm: Some(20.0),
                carton_height_cm: Some(15.0),
                carton_weight_kg: Some(5.5),
                labels_generated_at: Some(Utc::now()),
                labels_qty: Some(30),
                ..ReadinessRecord::initial(id)
            }),
            generated_on: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::PurchaseOrderId;
use crate::party::Address;

/// Purchase order line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit: Option<String>,
    /// Price per unit in the order currency; kept at sub-cent precision.
    pub unit_price: f64,
}

impl LineItem {
    /// Line total (`quantity × unit_price`), unrounded.
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Shipping metadata captured on the purchase order itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingMetadata {
    pub carton_count: Option<i64>,
    pub gross_weight_kg: Option<f64>,
    pub net_weight_kg: Option<f64>,
    pub volume_cbm: Option<f64>,
    pub shipping_mark: Option<String>,
}

impl ShippingMetadata {
    pub fn is_empty(&self) -> bool {
        self.carton_count.is_none()
            && self.gross_weight_kg.is_none()
            && self.net_weight_kg.is_none()
            && self.volume_cbm.is_none()
            && self.shipping_mark.as_deref().is_none_or(|m| m.trim().is_empty())
    }
}

/// Purchase order as handed over by the purchasing workflow.
///
/// Read-only input: nothing in the pack pipeline mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub po_number: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub currency: String,
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub incoterm: Option<String>,
    #[serde(default)]
    pub incoterm_location: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub production_lead_time_days: Option<u32>,
    #[serde(default)]
    pub shipping_lead_time_days: Option<u32>,
    #[serde(default)]
    pub quote_valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub delivery_address: Option<Address>,
    #[serde(default)]
    pub shipping: ShippingMetadata,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PurchaseOrder {
    /// Sum of all line totals, unrounded.
    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(LineItem::total).sum()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Incoterm with its named place, e.g. `FOB Shenzhen`.
    pub fn incoterm_display(&self) -> Option<String> {
        let term = self.incoterm.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        match self.incoterm_location.as_deref().map(str::trim) {
            Some(loc) if !loc.is_empty() => Some(format!("{term} {loc}")),
            _ => Some(term.to_string()),
        }
    }
}

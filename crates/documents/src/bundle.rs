use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use packforge_core::{Party, ProductIdentifiers, PurchaseOrder, ReadinessRecord};

use crate::error::{DocumentError, DocumentResult};

/// Everything the renderers read for one purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBundle {
    pub order: PurchaseOrder,
    /// The buying company.
    pub company: Party,
    /// The manufacturer receiving the pack.
    #[serde(default)]
    pub supplier: Option<Party>,
    #[serde(default)]
    pub identifiers: Option<ProductIdentifiers>,
    #[serde(default)]
    pub readiness: Option<ReadinessRecord>,
    /// Date printed on the documents.
    #[serde(default = "today")]
    pub generated_on: NaiveDate,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl DocumentBundle {
    pub fn new(order: PurchaseOrder, company: Party) -> Self {
        Self {
            order,
            company,
            supplier: None,
            identifiers: None,
            readiness: None,
            generated_on: today(),
        }
    }

    pub fn readiness(&self) -> DocumentResult<&ReadinessRecord> {
        self.readiness.as_ref().ok_or(DocumentError::MissingReadiness)
    }

    pub fn sku(&self) -> Option<&str> {
        self.identifiers.as_ref().and_then(ProductIdentifiers::sku)
    }

    pub fn supplier_name(&self) -> Option<&str> {
        self.supplier
            .as_ref()
            .map(|s| s.name.trim())
            .filter(|n| !n.is_empty())
    }
}

/// Printable lines describing a party, skipping empty fields.
pub(crate) fn party_lines(party: &Party) -> Vec<String> {
    let mut lines = Vec::new();
    let name = party.name.trim();
    if !name.is_empty() {
        lines.push(name.to_string());
    }
    let labelled = [
        ("Contact", party.contact_name.as_deref()),
        ("Email", party.email.as_deref()),
        ("Phone", party.phone.as_deref()),
        ("Tax ID", party.tax_id.as_deref()),
    ];
    for (label, value) in labelled {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            lines.push(format!("{label}: {v}"));
        }
    }
    if let Some(address) = &party.address {
        lines.extend(address.lines());
    }
    lines
}

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Postal address as captured by the purchase-order forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl ValueObject for Address {}

impl Address {
    /// Address rendered as printable lines, skipping empty parts.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        push_non_empty(&mut out, Some(self.line1.as_str()));
        push_non_empty(&mut out, self.line2.as_deref());

        let locality = [self.postal_code.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        push_non_empty(&mut out, Some(locality.as_str()));
        push_non_empty(&mut out, self.region.as_deref());
        push_non_empty(&mut out, self.country.as_deref());
        out
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

fn push_non_empty(out: &mut Vec<String>, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        out.push(v.to_string());
    }
}

/// A company taking part in a purchase order (buyer or supplier).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Party {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<Address>,
}

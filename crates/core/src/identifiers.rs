use serde::{Deserialize, Serialize};

use crate::id::ProjectId;

/// GTIN family of the stored barcode number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GtinType {
    Ean13,
    Ean8,
    UpcA,
    Gtin14,
    /// The marketplace approved selling without a GTIN.
    Exempt,
}

impl GtinType {
    /// Number of digits expected for the type, if it carries a number at all.
    pub fn digits(self) -> Option<usize> {
        match self {
            GtinType::Ean13 => Some(13),
            GtinType::Ean8 => Some(8),
            GtinType::UpcA => Some(12),
            GtinType::Gtin14 => Some(14),
            GtinType::Exempt => None,
        }
    }
}

/// Active identifier set of a project.
///
/// GTIN (or an exemption) and SKU are required independently of each other;
/// FNSKU is only needed when the fulfilment program labels units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductIdentifiers {
    pub project_id: Option<ProjectId>,
    pub gtin_code: Option<String>,
    pub gtin_type: Option<GtinType>,
    pub fnsku: Option<String>,
    pub asin: Option<String>,
    pub sku: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProductIdentifiers {
    pub fn fnsku(&self) -> Option<&str> {
        non_empty(&self.fnsku)
    }

    pub fn sku(&self) -> Option<&str> {
        non_empty(&self.sku)
    }

    pub fn asin(&self) -> Option<&str> {
        non_empty(&self.asin)
    }

    /// GTIN number, unless the project is GTIN-exempt.
    pub fn gtin(&self) -> Option<&str> {
        if self.is_gtin_exempt() {
            return None;
        }
        non_empty(&self.gtin_code)
    }

    pub fn is_gtin_exempt(&self) -> bool {
        self.gtin_type == Some(GtinType::Exempt)
    }

    pub fn has_gtin_or_exemption(&self) -> bool {
        self.is_gtin_exempt() || self.gtin().is_some()
    }

    /// Whether the stored GTIN passes its length and mod-10 check digit.
    ///
    /// Returns `None` when there is no GTIN to check.
    pub fn gtin_is_well_formed(&self) -> Option<bool> {
        let code = self.gtin()?;
        if let Some(expected) = self.gtin_type.and_then(GtinType::digits) {
            if code.len() != expected {
                return Some(false);
            }
        }
        Some(gtin_check_digit_ok(code))
    }

    /// Identifier printed and encoded on unit labels.
    ///
    /// FNSKU when the fulfilment program requires it, otherwise the GTIN, and
    /// the SKU as a last resort.
    pub fn label_payload(&self, needs_fnsku: bool) -> Option<&str> {
        if needs_fnsku {
            return self.fnsku();
        }
        self.gtin().or_else(|| self.sku())
    }
}

/// Standard GS1 mod-10 check over an 8/12/13/14 digit code.
pub fn gtin_check_digit_ok(code: &str) -> bool {
    if !matches!(code.len(), 8 | 12 | 13 | 14) || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = code.bytes().map(|b| u32::from(b - b'0')).collect();
    let (body, check) = digits.split_at(digits.len() - 1);
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> ProductIdentifiers {
        ProductIdentifiers {
            project_id: None,
            gtin_code: Some("4006381333931".to_string()),
            gtin_type: Some(GtinType::Ean13),
            fnsku: Some("X001ABCDEF".to_string()),
            asin: Some("B000TEST01".to_string()),
            sku: Some("MUG-BLUE".to_string()),
        }
    }

    #[test]
    fn known_ean13_passes_check_digit() {
        assert!(gtin_check_digit_ok("4006381333931"));
        assert!(!gtin_check_digit_ok("4006381333932"));
        assert!(gtin_check_digit_ok("036000291452"));
        assert!(gtin_check_digit_ok("96385074"));
    }

    #[test]
    fn blank_fnsku_counts_as_missing() {
        let mut ids = ids();
        ids.fnsku = Some("   ".to_string());
        assert_eq!(ids.fnsku(), None);
    }

    #[test]
    fn exemption_satisfies_gtin_requirement() {
        let mut ids = ids();
        ids.gtin_code = None;
        ids.gtin_type = Some(GtinType::Exempt);
        assert!(ids.has_gtin_or_exemption());
        assert_eq!(ids.gtin_is_well_formed(), None);
    }

    #[test]
    fn label_payload_prefers_fnsku_then_gtin_then_sku() {
        let mut ids = ids();
        assert_eq!(ids.label_payload(true), Some("X001ABCDEF"));
        assert_eq!(ids.label_payload(false), Some("4006381333931"));
        ids.gtin_type = Some(GtinType::Exempt);
        assert_eq!(ids.label_payload(false), Some("MUG-BLUE"));
        ids.fnsku = None;
        assert_eq!(ids.label_payload(true), None);
    }

    #[test]
    fn wrong_length_for_type_is_malformed() {
        let mut ids = ids();
        ids.gtin_type = Some(GtinType::UpcA);
        assert_eq!(ids.gtin_is_well_formed(), Some(false));
    }
}

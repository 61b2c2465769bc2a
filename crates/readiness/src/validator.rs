use serde::Serialize;

use packforge_core::{DocumentKind, PackSelection, ProductIdentifiers, PurchaseOrder, ReadinessRecord};

use crate::evaluator::NOT_INITIALIZED;
use crate::rules::{RULES, RuleContext, Severity};

/// Outcome of the pack pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PackValidation {
    fn from_issues(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Check whether the requested documents can be generated.
///
/// A field is only required when a selected document depends on it; when
/// several selected documents depend on the same field the strongest severity
/// applies and the reason is reported once.
pub fn validate_pack(
    order: &PurchaseOrder,
    identifiers: Option<&ProductIdentifiers>,
    readiness: Option<&ReadinessRecord>,
    selection: &PackSelection,
) -> PackValidation {
    let kinds = selection.kinds();

    if kinds.is_empty() {
        return PackValidation::from_issues(
            vec!["Select at least one document".to_string()],
            Vec::new(),
        );
    }

    if readiness.is_none() && kinds.iter().any(|k| k.requires_readiness()) {
        return PackValidation::from_issues(vec![NOT_INITIALIZED.to_string()], Vec::new());
    }

    let ctx = RuleContext::new(order, identifiers, readiness);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for rule in RULES {
        let Some(severity) = rule.severity_for(&kinds) else {
            continue;
        };
        if !rule.fails(&ctx) {
            continue;
        }
        match severity {
            Severity::Error => errors.push(rule.reason.to_string()),
            Severity::Warning => warnings.push(rule.reason.to_string()),
        }
    }

    PackValidation::from_issues(errors, warnings)
}

/// Kinds whose generation is blocked by the current inputs.
///
/// Useful for greying out choices before the caller commits to a selection.
pub fn blocked_documents(
    order: &PurchaseOrder,
    identifiers: Option<&ProductIdentifiers>,
    readiness: Option<&ReadinessRecord>,
) -> Vec<DocumentKind> {
    DocumentKind::ALL
        .into_iter()
        .filter(|kind| {
            !validate_pack(order, identifiers, readiness, &PackSelection::only(*kind)).valid
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{identifiers, order, ready_record};
    use packforge_core::GtinType;

    #[test]
    fn scenario_c_carton_labels_require_carton_count() {
        let order = order();
        let mut record = ready_record(order.id);
        record.cartons_count = None;

        let selection = PackSelection::only(DocumentKind::CartonLabels);
        let result = validate_pack(&order, Some(&identifiers()), Some(&record), &selection);

        assert!(!result.valid);
        assert!(result.errors.iter().any(|e| e.contains("Cartons count")));
    }

    #[test]
    fn packing_list_alone_downgrades_carton_facts_to_warnings() {
        let order = order();
        let mut record = ready_record(order.id);
        record.carton_length_cm = None;
        record.carton_weight_kg = Some(0.0);

        let selection = PackSelection::only(DocumentKind::PackingList);
        let result = validate_pack(&order, Some(&identifiers()), Some(&record), &selection);

        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(
            result.warnings,
            vec![
                "Carton length must be greater than 0",
                "Carton weight must be greater than 0",
            ]
        );
    }

    #[test]
    fn packing_list_and_carton_labels_report_shared_field_once_as_error() {
        let order = order();
        let mut record = ready_record(order.id);
        record.carton_height_cm = None;

        let selection =
            PackSelection::only(DocumentKind::PackingList).with(DocumentKind::CartonLabels);
        let result = validate_pack(&order, Some(&identifiers()), Some(&record), &selection);

        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Carton height must be greater than 0"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn labels_without_fnsku_is_always_an_error() {
        let order = order();
        let record = ready_record(order.id);
        let mut ids = identifiers();
        ids.fnsku = None;

        let selection = PackSelection::only(DocumentKind::IdentificationLabels);
        let result = validate_pack(&order, Some(&ids), Some(&record), &selection);

        assert!(!result.valid);
        assert_eq!(result.errors, vec!["FNSKU is missing"]);
    }

    #[test]
    fn label_generation_state_does_not_block_the_pack() {
        let order = order();
        let mut record = ready_record(order.id);
        record.labels_generated_at = None;
        record.labels_qty = None;

        let selection = PackSelection::only(DocumentKind::IdentificationLabels);
        let result = validate_pack(&order, Some(&identifiers()), Some(&record), &selection);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn missing_record_short_circuits_for_packaging_documents() {
        let order = order();
        let selection = PackSelection::only(DocumentKind::PackingList);
        let result = validate_pack(&order, Some(&identifiers()), None, &selection);

        assert_eq!(
            result,
            PackValidation {
                valid: false,
                errors: vec![NOT_INITIALIZED.to_string()],
                warnings: vec![],
            }
        );
    }

    #[test]
    fn order_sheet_alone_needs_no_readiness_record() {
        let order = order();
        let selection = PackSelection::only(DocumentKind::OrderSheet);
        let result = validate_pack(&order, None, None, &selection);
        assert!(result.valid);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn order_sheet_without_lines_is_blocked() {
        let mut order = order();
        order.items.clear();
        order.incoterm = None;

        let selection = PackSelection::only(DocumentKind::OrderSheet);
        let result = validate_pack(&order, None, None, &selection);
        assert_eq!(result.errors, vec!["Purchase order has no line items"]);
        assert_eq!(result.warnings, vec!["Incoterm is not set"]);
    }

    #[test]
    fn gtin_labels_without_fnsku_need_some_identifier() {
        let order = order();
        let mut record = ready_record(order.id);
        record.needs_fnsku = false;
        let ids = ProductIdentifiers::default();

        let selection = PackSelection::only(DocumentKind::IdentificationLabels);
        let result = validate_pack(&order, Some(&ids), Some(&record), &selection);
        assert_eq!(result.errors, vec!["No GTIN or SKU available to print on labels"]);
    }

    #[test]
    fn labels_need_a_known_quantity() {
        let order = order();
        let mut record = ReadinessRecord::initial(order.id);

        let selection = PackSelection::only(DocumentKind::IdentificationLabels);
        let result = validate_pack(&order, Some(&identifiers()), Some(&record), &selection);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Label quantity is unknown: set a label quantity, or cartons count and units per carton"]
        );

        record.cartons_count = Some(4);
        record.units_per_carton = Some(12);
        let result = validate_pack(&order, Some(&identifiers()), Some(&record), &selection);
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn missing_gtin_is_advisory_unless_exempt() {
        let order = order();
        let record = ready_record(order.id);
        let mut ids = identifiers();
        ids.gtin_code = None;
        ids.gtin_type = None;

        let selection = PackSelection::only(DocumentKind::IdentificationLabels);
        let result = validate_pack(&order, Some(&ids), Some(&record), &selection);
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec!["GTIN is missing and the product is not marked GTIN-exempt"]
        );

        ids.gtin_type = Some(GtinType::Exempt);
        let result = validate_pack(&order, Some(&ids), Some(&record), &selection);
        assert!(result.warnings.is_empty());

        let selection = PackSelection::only(DocumentKind::PackingList);
        let packing = validate_pack(&order, None, Some(&record), &selection);
        assert!(packing.warnings.iter().all(|w| !w.starts_with("GTIN")));
    }

    #[test]
    fn bad_gtin_check_digit_is_advisory() {
        let order = order();
        let record = ready_record(order.id);
        let mut ids = identifiers();
        ids.gtin_code = Some("4006381333932".to_string());

        let selection = PackSelection::only(DocumentKind::IdentificationLabels);
        let result = validate_pack(&order, Some(&ids), Some(&record), &selection);
        assert!(result.valid);
        assert_eq!(result.warnings, vec!["GTIN check digit is invalid"]);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let order = order();
        let result = validate_pack(&order, None, None, &PackSelection::default());
        assert!(!result.valid);
    }

    #[test]
    fn blocked_documents_lists_only_failing_kinds() {
        let order = order();
        let mut record = ready_record(order.id);
        record.cartons_count = None;

        let blocked = blocked_documents(&order, Some(&identifiers()), Some(&record));
        assert_eq!(blocked, vec![DocumentKind::CartonLabels]);
    }
}

use serde::Serialize;

use packforge_core::{ProductIdentifiers, PurchaseOrder, ReadinessRecord};

use crate::rules::{RULES, RuleContext};

/// Reason reported when no readiness record exists yet.
pub const NOT_INITIALIZED: &str = "Readiness record not initialized";

/// Outcome of the readiness gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessResult {
    pub ready: bool,
    pub missing: Vec<String>,
}

/// Evaluate whether an order has enough data to produce compliant shipment
/// documentation.
///
/// Pure and deterministic: reasons come out in rule-table order (FNSKU rules
/// first, then packaging fields).
pub fn evaluate_readiness(
    order: &PurchaseOrder,
    identifiers: Option<&ProductIdentifiers>,
    readiness: Option<&ReadinessRecord>,
) -> ReadinessResult {
    if readiness.is_none() {
        return ReadinessResult {
            ready: false,
            missing: vec![NOT_INITIALIZED.to_string()],
        };
    }

    let ctx = RuleContext::new(order, identifiers, readiness);
    let missing: Vec<String> = RULES
        .iter()
        .filter(|rule| rule.gate && rule.fails(&ctx))
        .map(|rule| rule.reason.to_string())
        .collect();

    ReadinessResult {
        ready: missing.is_empty(),
        missing,
    }
}

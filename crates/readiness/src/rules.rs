//! Declarative requirement rules shared by the readiness gate and the pack
//! validator.
//!
//! Each rule names the field it guards, the message shown when it fails, a
//! precondition, a predicate, and the severity it carries for every document
//! that depends on it. Table order is the reporting order.

use serde::Serialize;

use packforge_core::{DocumentKind, ProductIdentifiers, PurchaseOrder, ReadinessRecord};

/// How a failed rule affects pack generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Recommended, does not block.
    Warning,
    /// Blocks generation.
    Error,
}

/// Field (or group of fields) a rule guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    Fnsku,
    LabelsGenerated,
    LabelsQty,
    LabelQuantity,
    LabelIdentifier,
    Gtin,
    GtinCheckDigit,
    UnitsPerCarton,
    CartonsCount,
    CartonLength,
    CartonWidth,
    CartonHeight,
    CartonWeight,
    LineItems,
    Incoterm,
    DeliveryAddress,
    Sku,
}

/// Inputs every rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub order: &'a PurchaseOrder,
    pub identifiers: Option<&'a ProductIdentifiers>,
    pub readiness: Option<&'a ReadinessRecord>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        order: &'a PurchaseOrder,
        identifiers: Option<&'a ProductIdentifiers>,
        readiness: Option<&'a ReadinessRecord>,
    ) -> Self {
        Self {
            order,
            identifiers,
            readiness,
        }
    }

    fn needs_fnsku(&self) -> bool {
        self.readiness.is_some_and(|r| r.needs_fnsku)
    }

    fn readiness_has(&self, read: impl Fn(&ReadinessRecord) -> bool) -> bool {
        self.readiness.is_some_and(read)
    }
}

/// A single requirement.
#[derive(Debug)]
pub struct Rule {
    pub field: RuleField,
    pub reason: &'static str,
    /// Precondition; the rule is skipped when it does not hold.
    pub applies: fn(&RuleContext<'_>) -> bool,
    pub satisfied: fn(&RuleContext<'_>) -> bool,
    /// Part of the readiness gate.
    pub gate: bool,
    /// Severity per document that depends on the field.
    pub documents: &'static [(DocumentKind, Severity)],
}

impl Rule {
    /// Whether the rule fails for the given inputs (precondition included).
    pub fn fails(&self, ctx: &RuleContext<'_>) -> bool {
        (self.applies)(ctx) && !(self.satisfied)(ctx)
    }

    /// Strongest severity among the selected documents, if any depends on the rule.
    pub fn severity_for(&self, kinds: &[DocumentKind]) -> Option<Severity> {
        self.documents
            .iter()
            .filter(|(kind, _)| kinds.contains(kind))
            .map(|(_, severity)| *severity)
            .max()
    }
}

fn always(_: &RuleContext<'_>) -> bool {
    true
}

fn needs_fnsku(ctx: &RuleContext<'_>) -> bool {
    ctx.needs_fnsku()
}

fn labels_without_fnsku(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness.is_some_and(|r| !r.needs_fnsku)
}

fn has_gtin(ctx: &RuleContext<'_>) -> bool {
    ctx.identifiers.and_then(ProductIdentifiers::gtin).is_some()
}

fn fnsku_present(ctx: &RuleContext<'_>) -> bool {
    ctx.identifiers.and_then(ProductIdentifiers::fnsku).is_some()
}

fn labels_generated(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.labels_generated_at.is_some())
}

fn labels_qty_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.labels_qty().is_some())
}

fn label_quantity_known(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.labels_qty().or_else(|| r.total_units()).is_some())
}

fn gtin_or_exemption(ctx: &RuleContext<'_>) -> bool {
    ctx.identifiers
        .is_some_and(ProductIdentifiers::has_gtin_or_exemption)
}

fn label_identifier_present(ctx: &RuleContext<'_>) -> bool {
    ctx.identifiers
        .and_then(|ids| ids.label_payload(false))
        .is_some()
}

fn gtin_well_formed(ctx: &RuleContext<'_>) -> bool {
    ctx.identifiers
        .and_then(ProductIdentifiers::gtin_is_well_formed)
        .unwrap_or(true)
}

fn units_per_carton_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.units_per_carton().is_some())
}

fn cartons_count_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.cartons_count().is_some())
}

fn carton_length_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.carton_length_cm().is_some())
}

fn carton_width_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.carton_width_cm().is_some())
}

fn carton_height_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.carton_height_cm().is_some())
}

fn carton_weight_positive(ctx: &RuleContext<'_>) -> bool {
    ctx.readiness_has(|r| r.carton_weight_kg().is_some())
}

fn has_line_items(ctx: &RuleContext<'_>) -> bool {
    !ctx.order.items.is_empty()
}

fn has_incoterm(ctx: &RuleContext<'_>) -> bool {
    ctx.order.incoterm_display().is_some()
}

fn has_delivery_address(ctx: &RuleContext<'_>) -> bool {
    ctx.order
        .delivery_address
        .as_ref()
        .is_some_and(|a| !a.is_empty())
}

fn sku_present(ctx: &RuleContext<'_>) -> bool {
    ctx.identifiers.and_then(ProductIdentifiers::sku).is_some()
}

use DocumentKind::{CartonLabels, IdentificationLabels, OrderSheet, PackingList};
use Severity::{Error, Warning};

/// Carton facts are recommended on the packing list and required on carton labels.
const CARTON_FACT: &[(DocumentKind, Severity)] = &[(PackingList, Warning), (CartonLabels, Error)];

/// The rule table. FNSKU rules come first, then packaging fields in a fixed
/// order, then document-only checks.
pub static RULES: &[Rule] = &[
    Rule {
        field: RuleField::Fnsku,
        reason: "FNSKU is missing",
        applies: needs_fnsku,
        satisfied: fnsku_present,
        gate: true,
        documents: &[(IdentificationLabels, Error)],
    },
    Rule {
        field: RuleField::LabelsGenerated,
        reason: "FNSKU labels have not been generated",
        applies: needs_fnsku,
        satisfied: labels_generated,
        gate: true,
        documents: &[],
    },
    Rule {
        field: RuleField::LabelsQty,
        reason: "FNSKU label quantity must be greater than 0",
        applies: needs_fnsku,
        satisfied: labels_qty_positive,
        gate: true,
        documents: &[],
    },
    Rule {
        field: RuleField::UnitsPerCarton,
        reason: "Units per carton must be greater than 0",
        applies: always,
        satisfied: units_per_carton_positive,
        gate: true,
        documents: CARTON_FACT,
    },
    Rule {
        field: RuleField::CartonsCount,
        reason: "Cartons count must be greater than 0",
        applies: always,
        satisfied: cartons_count_positive,
        gate: true,
        documents: CARTON_FACT,
    },
    Rule {
        field: RuleField::CartonLength,
        reason: "Carton length must be greater than 0",
        applies: always,
        satisfied: carton_length_positive,
        gate: true,
        documents: CARTON_FACT,
    },
    Rule {
        field: RuleField::CartonWidth,
        reason: "Carton width must be greater than 0",
        applies: always,
        satisfied: carton_width_positive,
        gate: true,
        documents: CARTON_FACT,
    },
    Rule {
        field: RuleField::CartonHeight,
        reason: "Carton height must be greater than 0",
        applies: always,
        satisfied: carton_height_positive,
        gate: true,
        documents: CARTON_FACT,
    },
    Rule {
        field: RuleField::CartonWeight,
        reason: "Carton weight must be greater than 0",
        applies: always,
        satisfied: carton_weight_positive,
        gate: true,
        documents: CARTON_FACT,
    },
    Rule {
        field: RuleField::LabelQuantity,
        reason: "Label quantity is unknown: set a label quantity, or cartons count and units per carton",
        applies: always,
        satisfied: label_quantity_known,
        gate: false,
        documents: &[(IdentificationLabels, Error)],
    },
    Rule {
        field: RuleField::LabelIdentifier,
        reason: "No GTIN or SKU available to print on labels",
        applies: labels_without_fnsku,
        satisfied: label_identifier_present,
        gate: false,
        documents: &[(IdentificationLabels, Error)],
    },
    Rule {
        field: RuleField::Gtin,
        reason: "GTIN is missing and the product is not marked GTIN-exempt",
        applies: always,
        satisfied: gtin_or_exemption,
        gate: false,
        documents: &[(IdentificationLabels, Warning)],
    },
    Rule {
        field: RuleField::GtinCheckDigit,
        reason: "GTIN check digit is invalid",
        applies: has_gtin,
        satisfied: gtin_well_formed,
        gate: false,
        documents: &[(IdentificationLabels, Warning)],
    },
    Rule {
        field: RuleField::LineItems,
        reason: "Purchase order has no line items",
        applies: always,
        satisfied: has_line_items,
        gate: false,
        documents: &[(OrderSheet, Error), (PackingList, Warning)],
    },
    Rule {
        field: RuleField::Incoterm,
        reason: "Incoterm is not set",
        applies: always,
        satisfied: has_incoterm,
        gate: false,
        documents: &[(OrderSheet, Warning)],
    },
    Rule {
        field: RuleField::DeliveryAddress,
        reason: "Delivery address is missing",
        applies: always,
        satisfied: has_delivery_address,
        gate: false,
        documents: &[(OrderSheet, Warning)],
    },
    Rule {
        field: RuleField::Sku,
        reason: "SKU is missing",
        applies: always,
        satisfied: sku_present,
        gate: false,
        documents: &[(CartonLabels, Warning)],
    },
];

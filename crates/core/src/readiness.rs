use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::PurchaseOrderId;
use crate::value_object::ValueObject;

/// Packaging and labelling facts collected for one purchase order.
///
/// Created lazily the first time an order is evaluated and filled in
/// incrementally afterwards. Counts are signed so that values typed into the
/// forms can be rejected instead of silently clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessRecord {
    pub po_id: PurchaseOrderId,
    #[serde(default = "default_needs_fnsku")]
    pub needs_fnsku: bool,
    #[serde(default)]
    pub units_per_carton: Option<i64>,
    #[serde(default)]
    pub cartons_count: Option<i64>,
    #[serde(default)]
    pub carton_length_cm: Option<f64>,
    #[serde(default)]
    pub carton_width_cm: Option<f64>,
    #[serde(default)]
    pub carton_height_cm: Option<f64>,
    #[serde(default)]
    pub carton_weight_kg: Option<f64>,
    #[serde(default)]
    pub labels_generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels_qty: Option<i64>,
    #[serde(default)]
    pub labels_template: Option<String>,
    #[serde(default)]
    pub manufacturer_pack_generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub manufacturer_pack_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub manufacturer_pack_version: Option<u32>,
}

fn default_needs_fnsku() -> bool {
    true
}

/// Outer carton size in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartonDimensions {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl ValueObject for CartonDimensions {}

impl CartonDimensions {
    pub fn volume_cbm(&self) -> f64 {
        self.length_cm * self.width_cm * self.height_cm / 1_000_000.0
    }
}

fn positive_f64(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn positive_i64(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}

impl ReadinessRecord {
    /// Default record for an order seen for the first time.
    pub fn initial(po_id: PurchaseOrderId) -> Self {
        Self {
            po_id,
            needs_fnsku: true,
            units_per_carton: None,
            cartons_count: None,
            carton_length_cm: None,
            carton_width_cm: None,
            carton_height_cm: None,
            carton_weight_kg: None,
            labels_generated_at: None,
            labels_qty: None,
            labels_template: None,
            manufacturer_pack_generated_at: None,
            manufacturer_pack_sent_at: None,
            manufacturer_pack_version: None,
        }
    }

    pub fn units_per_carton(&self) -> Option<i64> {
        positive_i64(self.units_per_carton)
    }

    pub fn cartons_count(&self) -> Option<i64> {
        positive_i64(self.cartons_count)
    }

    pub fn labels_qty(&self) -> Option<i64> {
        positive_i64(self.labels_qty)
    }

    pub fn carton_length_cm(&self) -> Option<f64> {
        positive_f64(self.carton_length_cm)
    }

    pub fn carton_width_cm(&self) -> Option<f64> {
        positive_f64(self.carton_width_cm)
    }

    pub fn carton_height_cm(&self) -> Option<f64> {
        positive_f64(self.carton_height_cm)
    }

    pub fn carton_weight_kg(&self) -> Option<f64> {
        positive_f64(self.carton_weight_kg)
    }

    /// All three dimensions, only when each of them is positive.
    pub fn carton_dimensions(&self) -> Option<CartonDimensions> {
        Some(CartonDimensions {
            length_cm: self.carton_length_cm()?,
            width_cm: self.carton_width_cm()?,
            height_cm: self.carton_height_cm()?,
        })
    }

    /// `cartonsCount × unitsPerCarton` when both are present.
    pub fn total_units(&self) -> Option<i64> {
        Some(self.cartons_count()? * self.units_per_carton()?)
    }

    /// `cartonsCount × cartonWeight` when both are present.
    pub fn total_weight_kg(&self) -> Option<f64> {
        Some(self.cartons_count()? as f64 * self.carton_weight_kg()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_record_needs_fnsku_and_nothing_else() {
        let record = ReadinessRecord::initial(PurchaseOrderId::new());
        assert!(record.needs_fnsku);
        assert_eq!(record.total_units(), None);
        assert_eq!(record.carton_dimensions(), None);
        assert_eq!(record.manufacturer_pack_version, None);
    }

    #[test]
    fn totals_require_both_operands() {
        let mut record = ReadinessRecord::initial(PurchaseOrderId::new());
        record.cartons_count = Some(10);
        assert_eq!(record.total_units(), None);
        record.units_per_carton = Some(24);
        record.carton_weight_kg = Some(5.5);
        assert_eq!(record.total_units(), Some(240));
        assert_eq!(record.total_weight_kg(), Some(55.0));
    }

    #[test]
    fn non_positive_values_read_as_missing() {
        let mut record = ReadinessRecord::initial(PurchaseOrderId::new());
        record.cartons_count = Some(0);
        record.carton_length_cm = Some(-3.0);
        record.carton_weight_kg = Some(f64::NAN);
        assert_eq!(record.cartons_count(), None);
        assert_eq!(record.carton_length_cm(), None);
        assert_eq!(record.carton_weight_kg(), None);
    }

    #[test]
    fn missing_needs_fnsku_defaults_to_true_when_deserializing() {
        let json = format!(r#"{{"poId":"{}"}}"#, PurchaseOrderId::new());
        let record: ReadinessRecord = serde_json::from_str(&json).unwrap();
        assert!(record.needs_fnsku);
    }
}

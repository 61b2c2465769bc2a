//! Runtime settings, read from `PACKFORGE_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use packforge_labels::BASELINE_DPI;
use packforge_labels::config::MAX_OFFSET_MM;

pub const ENV_OFFSET_X: &str = "PACKFORGE_LABEL_OFFSET_X_MM";
pub const ENV_OFFSET_Y: &str = "PACKFORGE_LABEL_OFFSET_Y_MM";
pub const ENV_CARTON_LABELS_PER_PAGE: &str = "PACKFORGE_CARTON_LABELS_PER_PAGE";
pub const ENV_THERMAL_DPI: &str = "PACKFORGE_THERMAL_DPI";
pub const ENV_OUTPUT_DIR: &str = "PACKFORGE_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackConfig {
    /// Printer calibration applied to identification labels.
    pub label_offset_x_mm: f64,
    pub label_offset_y_mm: f64,
    /// 1 or 2.
    pub carton_labels_per_page: u8,
    pub thermal_dpi: u32,
    pub output_dir: PathBuf,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            label_offset_x_mm: 0.0,
            label_offset_y_mm: 0.0,
            carton_labels_per_page: 2,
            thermal_dpi: BASELINE_DPI,
            output_dir: PathBuf::from("."),
        }
    }
}

impl PackConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Invalid values are logged and
    /// replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            label_offset_x_mm: parse_or(&lookup, ENV_OFFSET_X, defaults.label_offset_x_mm, valid_offset),
            label_offset_y_mm: parse_or(&lookup, ENV_OFFSET_Y, defaults.label_offset_y_mm, valid_offset),
            carton_labels_per_page: parse_or(
                &lookup,
                ENV_CARTON_LABELS_PER_PAGE,
                defaults.carton_labels_per_page,
                |v| matches!(v, 1 | 2),
            ),
            thermal_dpi: parse_or(&lookup, ENV_THERMAL_DPI, defaults.thermal_dpi, |v| *v > 0),
            output_dir: lookup(ENV_OUTPUT_DIR)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

fn valid_offset(value: &f64) -> bool {
    value.is_finite() && value.abs() <= MAX_OFFSET_MM
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            tracing::warn!(key, value = %raw, ?default, "invalid setting; using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_values_use_defaults() {
        assert_eq!(PackConfig::from_lookup(|_| None), PackConfig::default());
    }

    #[test]
    fn reads_every_setting() {
        let config = PackConfig::from_lookup(lookup(&[
            (ENV_OFFSET_X, "0.8"),
            (ENV_OFFSET_Y, " -1.2 "),
            (ENV_CARTON_LABELS_PER_PAGE, "1"),
            (ENV_THERMAL_DPI, "300"),
            (ENV_OUTPUT_DIR, "/tmp/packs"),
        ]));
        assert_eq!(config.label_offset_x_mm, 0.8);
        assert_eq!(config.label_offset_y_mm, -1.2);
        assert_eq!(config.carton_labels_per_page, 1);
        assert_eq!(config.thermal_dpi, 300);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/packs"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = PackConfig::from_lookup(lookup(&[
            (ENV_OFFSET_X, "wide"),
            (ENV_OFFSET_Y, "40"),
            (ENV_CARTON_LABELS_PER_PAGE, "3"),
            (ENV_THERMAL_DPI, "0"),
            (ENV_OUTPUT_DIR, "  "),
        ]));
        assert_eq!(config, PackConfig::default());
    }
}

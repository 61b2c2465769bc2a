//! Number and date formatting shared by the renderers.

use chrono::NaiveDate;

use packforge_core::CartonDimensions;

/// Insert `,` every three digits of the integer part of an already formatted
/// number.
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    // no "-0.00"
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return text.trim_start_matches('-').to_string();
    }
    group_thousands(&text)
}

/// Monetary amount, two decimals.
pub fn money(value: f64) -> String {
    fixed(value, 2)
}

/// Amount prefixed with its currency code.
pub fn money_with_currency(value: f64, currency: &str) -> String {
    format!("{} {}", currency.trim(), money(value))
}

/// Unit price, three decimals.
pub fn unit_price(value: f64) -> String {
    fixed(value, 3)
}

pub fn quantity(value: i64) -> String {
    group_thousands(&value.to_string())
}

pub fn weight_kg(value: f64) -> String {
    format!("{} kg", fixed(value, 2))
}

pub fn volume_cbm(value: f64) -> String {
    format!("{} m\u{b3}", fixed(value, 3))
}

pub fn dimensions_cm(dims: &CartonDimensions) -> String {
    format!(
        "{} \u{d7} {} \u{d7} {} cm",
        trim_decimal(dims.length_cm),
        trim_decimal(dims.width_cm),
        trim_decimal(dims.height_cm)
    )
}

pub fn days(value: u32) -> String {
    if value == 1 {
        "1 day".to_string()
    } else {
        format!("{value} days")
    }
}

pub fn date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// `30` rather than `30.0`, `12.5` rather than `12.50`.
fn trim_decimal(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn money_uses_two_decimals_and_grouping() {
        assert_eq!(money(450.0), "450.00");
        assert_eq!(money(1234567.891), "1,234,567.89");
        assert_eq!(money(-1500.5), "-1,500.50");
        assert_eq!(money(-0.001), "0.00");
        assert_eq!(money_with_currency(12.5, "USD"), "USD 12.50");
    }

    #[test]
    fn unit_price_keeps_sub_cent_precision() {
        assert_eq!(unit_price(1.875), "1.875");
        assert_eq!(unit_price(0.1), "0.100");
        assert_eq!(unit_price(2500.0), "2,500.000");
    }

    #[test]
    fn dimensions_drop_trailing_zeros() {
        let dims = CartonDimensions {
            length_cm: 30.0,
            width_cm: 20.5,
            height_cm: 15.25,
        };
        assert_eq!(dimensions_cm(&dims), "30 \u{d7} 20.5 \u{d7} 15.25 cm");
    }

    #[test]
    fn small_helpers() {
        assert_eq!(quantity(1200), "1,200");
        assert_eq!(weight_kg(55.0), "55.00 kg");
        assert_eq!(days(1), "1 day");
        assert_eq!(days(35), "35 days");
        assert_eq!(date(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()), "2024-05-02");
    }

    proptest! {
        /// Property: removing the grouping separators gives back the plain
        /// two-decimal rendering.
        #[test]
        fn grouping_only_inserts_commas(cents in -10_000_000_000i64..10_000_000_000i64) {
            let value = cents as f64 / 100.0;
            let plain = format!("{value:.2}");
            let expected = if plain == "-0.00" { "0.00".to_string() } else { plain };
            prop_assert_eq!(money(value).replace(',', ""), expected);
        }
    }
}

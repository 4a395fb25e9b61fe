//! Money arithmetic
//!
//! Amounts are stored as `f64` in whole cents (validation rejects anything
//! finer); every sum runs in `Decimal` so no float drift accumulates.

use rust_decimal::prelude::*;

/// Smallest currency unit: cents
pub const DECIMAL_PLACES: u32 = 2;

/// Convert a stored amount to `Decimal`; non-finite values count as zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert a decimal sum back to the stored `f64` form
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// True when the amount carries digits below one cent
pub fn has_sub_cent_digits(value: f64) -> bool {
    match Decimal::from_f64(value) {
        Some(d) => d.round_dp(DECIMAL_PLACES) != d,
        None => true,
    }
}

/// Sum amounts in decimal space
pub fn sum<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(amounts.into_iter().map(to_decimal).sum())
}

/// Format with two decimals and the configured currency prefix, e.g. `RM75.00`
pub fn format_amount(currency: &str, amount: f64) -> String {
    format!("{currency}{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_is_exact_to_cents() {
        assert_eq!(sum([0.1, 0.2]), 0.3);
        assert_eq!(sum([30.0, 20.0, 45.0]), 95.0);
        assert_eq!(sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_non_finite_counts_as_zero() {
        assert_eq!(sum([f64::NAN, 10.0]), 10.0);
    }

    #[test]
    fn test_sub_cent_detection() {
        assert!(!has_sub_cent_digits(75.0));
        assert!(!has_sub_cent_digits(19.99));
        assert!(!has_sub_cent_digits(0.1));
        assert!(has_sub_cent_digits(10.005));
        assert!(has_sub_cent_digits(0.001));
        assert!(has_sub_cent_digits(f64::NAN));
    }

    #[test]
    fn test_sum_is_additive_over_cent_values() {
        let a = [12.35, 0.07, 19.99];
        let b = [0.01, 45.1, 3.33];
        let joined: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
        assert_eq!(sum([sum(a), sum(b)]), sum(joined));
    }

    #[test]
    fn test_sum_does_not_round() {
        assert_eq!(sum([0.005, 0.005]), 0.01);
        assert_eq!(sum([sum([0.005]), sum([0.005])]), sum([0.005, 0.005]));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("RM", 75.0), "RM75.00");
    }
}

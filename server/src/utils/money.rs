//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then converted
//! to `f64` for storage/serialization (2 decimal places, half-up).

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary `f64` to 2 decimal places, half-up.
///
/// Non-finite inputs (NaN, ±Inf) round to 0.0 — they cannot enter the store.
pub fn round_money(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Sum a sequence of optional monetary values; absent values contribute 0.
///
/// 缺失的金额按 0 计入总和 (左连接未命中的行)。
pub fn sum_money<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let total: Decimal = values
        .into_iter()
        .flatten()
        .filter_map(Decimal::from_f64)
        .sum();
    total
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(10.005), 10.01);
        assert_eq!(round_money(10.004), 10.0);
        assert_eq!(round_money(5.5), 5.5);
    }

    #[test]
    fn test_round_money_non_finite() {
        assert_eq!(round_money(f64::NAN), 0.0);
        assert_eq!(round_money(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_sum_money_skips_missing() {
        let total = sum_money([Some(10.0), None, Some(5.5)]);
        assert_eq!(total, 15.5);
    }

    #[test]
    fn test_sum_money_avoids_float_drift() {
        // 0.1 + 0.2 is the classic f64 drift case
        let total = sum_money([Some(0.1), Some(0.2)]);
        assert_eq!(total, 0.3);
    }
}

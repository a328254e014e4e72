//! Common utility functions for tax calculations.
//!
//! This module provides shared numeric helpers used by the engine and the
//! text formatting used for slab labels and reports.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to whole rupees using half-up rounding.
///
/// Values at exactly 0.5 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_to_rupee;
///
/// assert_eq!(round_to_rupee(dec!(11249.5)), dec!(11250));
/// assert_eq!(round_to_rupee(dec!(11249.49)), dec!(11249));
/// assert_eq!(round_to_rupee(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_to_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount as whole rupees with comma thousands separators.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::format_amount;
///
/// assert_eq!(format_amount(dec!(1500000)), "1,500,000");
/// assert_eq!(format_amount(dec!(-11700.4)), "-11,700");
/// ```
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_to_rupee(value);
    if rounded.is_zero() {
        return "0".to_string();
    }

    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats an amount with the rupee sign, e.g. `₹300,000`.
pub fn format_inr(value: Decimal) -> String {
    format!("₹{}", format_amount(value))
}

/// Formats a percentage rate without trailing zeros, e.g. `5` or `12.5`.
pub fn format_rate(rate: Decimal) -> String {
    rate.normalize().to_string()
}

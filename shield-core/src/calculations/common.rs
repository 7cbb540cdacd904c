//! Shared helpers for monetary arithmetic.

use rust_decimal::Decimal;

/// Rounds a monetary value to two decimal places, midpoint away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use shield_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(270.424)), dec!(270.42));
/// assert_eq!(round_half_up(dec!(270.425)), dec!(270.43));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two decimal values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Clamps a value to zero when negative.
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

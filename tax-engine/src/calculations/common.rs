//! Shared helpers for tax calculations.

use rust_decimal::Decimal;

/// Rounds a currency or rate value to two decimal places, half away from
/// zero.
///
/// Applied once when an estimate result is produced; intermediate
/// accumulation stays at full precision so rounding error cannot compound
/// across brackets.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_engine::calculations::common::round_currency;
///
/// assert_eq!(round_currency(dec!(6307.504)), dec!(6307.50));
/// assert_eq!(round_currency(dec!(3343.125)), dec!(3343.13));
/// assert_eq!(round_currency(dec!(-3343.125)), dec!(-3343.13)); // Away from zero
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

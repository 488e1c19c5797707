//! Monetary arithmetic shared by every engine.
//!
//! Rates derive from a fixed 30-day month and 8-hour day. Every monetary
//! amount is rounded with [`round2`] as soon as it is produced; rates keep
//! full precision and are only rounded for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Days in a payroll month.
pub const DAYS_PER_MONTH: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Working hours in a payroll day.
pub const HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// One hundred, for percentage conversions.
pub const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds to 2 decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("2.345").unwrap()).to_string(), "2.35");
/// assert_eq!(round2(Decimal::from_str("-2.345").unwrap()).to_string(), "-2.35");
/// assert_eq!(round2(Decimal::from(7)).to_string(), "7.00");
/// ```
pub fn round2(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Daily rate of a monthly amount (amount / 30).
pub fn daily_rate(monthly_amount: Decimal) -> Decimal {
    monthly_amount / DAYS_PER_MONTH
}

/// Hourly rate of a monthly amount (amount / 30 / 8).
pub fn hourly_rate(monthly_amount: Decimal) -> Decimal {
    daily_rate(monthly_amount) / HOURS_PER_DAY
}

/// Applies a percentage (e.g. `33.33` for 33.33 %) to an amount.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / ONE_HUNDRED
}

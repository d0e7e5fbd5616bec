//! Decimal helpers shared by the engine and the breakdown readers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// Monetary values are reported with two decimal places.
pub const MONEY_SCALE: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round half-up (away from zero on a tie) to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// An amount left the range a `Decimal` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount is out of range")]
pub struct AmountOverflow;

pub type MoneyResult<T> = Result<T, AmountOverflow>;

pub fn checked_add(a: Decimal, b: Decimal) -> MoneyResult<Decimal> {
    a.checked_add(b).ok_or(AmountOverflow)
}

pub fn checked_mul(a: Decimal, b: Decimal) -> MoneyResult<Decimal> {
    a.checked_mul(b).ok_or(AmountOverflow)
}

pub fn checked_sum<I>(values: I) -> MoneyResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, checked_add)
}

/// `value * percentage / 100` with a missing percentage treated as zero.
pub fn percent_of(value: Decimal, percentage: Option<Decimal>) -> MoneyResult<Decimal> {
    match percentage {
        Some(p) => value
            .checked_mul(p)
            .and_then(|v| v.checked_div(HUNDRED))
            .ok_or(AmountOverflow),
        None => Ok(Decimal::ZERO),
    }
}

/// Read a number out of loosely-typed JSON.
///
/// Accepts JSON numbers and numeric strings (`"25000.00"`). Anything else,
/// including `null` and non-finite floats, reads as zero.
pub fn decimal_from_value(value: &Value) -> Decimal {
    lenient_decimal(value).unwrap_or(Decimal::ZERO)
}

/// Like [`decimal_from_value`] but keeps "absent" distinct from zero.
pub fn optional_decimal_from_value(value: &Value) -> Option<Decimal> {
    lenient_decimal(value)
}

fn lenient_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                // Go through the shortest decimal repr so 0.1 stays 0.1.
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .and_then(|f| Decimal::from_str(&f.to_string()).ok())
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

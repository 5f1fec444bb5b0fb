//! Parsing of form-bound currency strings.
//!
//! Dashboard forms hand the engine raw text such as `"$1,250,000"` or
//! `" 45000 "`. Every calculator goes through [`parse_currency`] so the
//! coercion rules live in one place:
//!
//! - every character other than ASCII digits, `.` and `-` is stripped;
//! - empty, unparsable or otherwise invalid text is `0`;
//! - amounts beyond [`MAX_AMOUNT`] in magnitude are invalid;
//! - amounts are rounded to cents.
//!
//! The field-level helpers add a warning for each coercion and, for
//! categories that cannot be negative, floor the amount at zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::types::Money;

/// Largest magnitude any single form amount may take (one trillion).
pub const MAX_AMOUNT: Money = dec!(1000000000000);

fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

enum Parsed {
    Amount(Money),
    OutOfRange,
    Invalid,
}

/// True for `-?digits(.digits)?` with more integer digits than Decimal can
/// hold, which `Decimal::from_str` rejects outright.
fn too_many_digits(cleaned: &str) -> bool {
    let body = cleaned.strip_prefix('-').unwrap_or(cleaned);
    let mut parts = body.splitn(2, '.');
    let integer = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();
    integer.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
        && integer.trim_start_matches('0').len() > 28
}

fn parse_bounded(raw: &str) -> Parsed {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Parsed::Invalid;
    }
    match Decimal::from_str(&cleaned) {
        Ok(v) if v.abs() <= MAX_AMOUNT => Parsed::Amount(to_cents(v)),
        Ok(_) => Parsed::OutOfRange,
        Err(_) if too_many_digits(&cleaned) => Parsed::OutOfRange,
        Err(_) => Parsed::Invalid,
    }
}

/// Parse a currency-formatted string into [`Money`], yielding zero for
/// empty, invalid or out-of-range input.
pub fn parse_currency(raw: &str) -> Money {
    match parse_bounded(raw) {
        Parsed::Amount(v) => v,
        Parsed::OutOfRange | Parsed::Invalid => Decimal::ZERO,
    }
}

/// Parse a field that may legitimately be negative (net income, for one).
/// Out-of-range amounts become zero with a warning.
pub fn parse_signed_field(field: &str, raw: &str, warnings: &mut Vec<String>) -> Money {
    match parse_bounded(raw) {
        Parsed::Amount(v) => v,
        Parsed::OutOfRange => {
            tracing::warn!(field, raw, "amount out of range");
            warnings.push(format!(
                "{field} exceeds the supported magnitude of {MAX_AMOUNT}; treated as 0"
            ));
            Decimal::ZERO
        }
        Parsed::Invalid => Decimal::ZERO,
    }
}

/// Parse a field that cannot be negative (expenses, assets, debt,
/// add-backs). Negative amounts are floored at zero with a warning.
pub fn parse_amount_field(field: &str, raw: &str, warnings: &mut Vec<String>) -> Money {
    let value = parse_signed_field(field, raw, warnings);
    if value < Decimal::ZERO {
        tracing::warn!(field, %value, "negative amount floored");
        warnings.push(format!("{field} {value} is negative; treated as 0"));
        return Decimal::ZERO;
    }
    value
}

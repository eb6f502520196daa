//! Lenient parsing of user-entered numeric strings
//!
//! Form fields arrive as text. Projection inputs degrade to 0 when a field is
//! blank or malformed; allocation inputs keep "unset" distinct from zero so an
//! incomplete row can be reported instead of silently allocated.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Normalize a localized number: trims whitespace, drops thousands spacing,
/// and accepts a comma as the decimal separator.
fn normalize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// Parse a real number, treating blank, malformed, or non-finite input as 0
pub fn parse_or_zero(input: &str) -> f64 {
    match normalize(input).parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a percentage field into a decimal rate (7 -> 0.07)
pub fn parse_percent(input: &str) -> f64 {
    parse_or_zero(input) / 100.0
}

/// Parse a whole number of periods; anything else is 0
pub fn parse_periods(input: &str) -> u32 {
    normalize(input).parse::<u32>().unwrap_or(0)
}

/// Parse a money or weight field, keeping blank/malformed input as unset
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let normalized = normalize(input);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Parse a lot size; must be a whole number of units
pub fn parse_lot_size(input: &str) -> Option<u32> {
    let value = parse_decimal(input)?;
    if value.fract().is_zero() {
        value.to_u32()
    } else {
        None
    }
}

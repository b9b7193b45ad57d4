//! Conversion between the decimal prices users type and the smallest token unit the
//! marketplace stores.

use crate::StorefrontError;

/// Fractional digits of Stellar assets (1 XLM = 10^7 stroops).
pub const DECIMALS: usize = 7;

const UNIT: i128 = 10_000_000;

/// Parses `"12.5"` into `125_000_000`.
///
/// Accepts a whole part, a fractional part or both (`"3"`, `".25"`, `"3."`). Signs,
/// exponents, separators and more than [`DECIMALS`] fractional digits are rejected.
pub fn parse_amount(text: &str) -> Result<i128, StorefrontError> {
    let text = text.trim();
    let invalid = || StorefrontError::InvalidAmount(text.to_owned());

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
        || fraction.len() > DECIMALS
    {
        return Err(invalid());
    }

    let whole: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };

    let mut fraction_units: i128 = 0;
    if !fraction.is_empty() {
        fraction_units = fraction.parse().map_err(|_| invalid())?;
        fraction_units *= 10i128.pow((DECIMALS - fraction.len()) as u32);
    }

    whole
        .checked_mul(UNIT)
        .and_then(|units| units.checked_add(fraction_units))
        .ok_or_else(invalid)
}

/// Formats `125_000_000` as `"12.5"`. Always keeps one fractional digit (`"3.0"`).
pub fn format_amount(amount: i128) -> String {
    let magnitude = amount.unsigned_abs();
    let unit = UNIT as u128;
    let whole = magnitude / unit;
    let fraction = format!("{:0width$}", magnitude % unit, width = DECIMALS);
    let fraction = match fraction.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{whole}.{fraction}")
}

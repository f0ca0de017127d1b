//! Normalization of the upstream's mixed numeric notation.
//!
//! The economy endpoints mix plain decimal strings (`"3245.50"`) with
//! Turkish-localized ones (`"3.245,50"`) and occasionally send plain
//! numbers or the placeholder `"-"`. Parsing never fails: anything
//! unusable becomes `0.0` so a single bad row cannot take down a cycle.

use crate::types::RawPrice;

/// Parses an optional wire value into a plain `f64`.
///
/// `None`, `"-"` and garbage all map to `0.0`; numbers pass through
/// unchanged.
pub fn parse_price(raw: Option<&RawPrice>) -> f64 {
    match raw {
        None => 0.0,
        Some(RawPrice::Number(n)) => *n,
        Some(RawPrice::Text(s)) => parse_price_str(s),
    }
}

/// Parses a price string in either plain or localized notation.
///
/// A dot without a comma means plain decimal. Otherwise dots are
/// thousands separators and the comma (if any) is the decimal point.
pub fn parse_price_str(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }

    if trimmed.contains('.') && !trimmed.contains(',') {
        return trimmed.parse().unwrap_or(0.0);
    }

    let cleaned = trimmed.replace('.', "").replace(',', ".");
    cleaned.parse().unwrap_or(0.0)
}

// src/extractors/locale.rs
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

// Leading number of the normalized text: sign, integer digits, optional fraction.
static NUMERIC_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?)([0-9]*)(?:\.([0-9]+))?").expect("Failed to compile NUMERIC_PREFIX_RE")
});

/// Converts a pt-BR formatted number (`1.234,56`) into a decimal.
///
/// Every `.` is a thousands separator and is removed; the first `,` becomes the
/// decimal point. Only the leading numeric part is read, so trailing separators
/// picked up from the surrounding text (`1.456,01,`) are ignored. Returns `None`
/// when there is no leading number at all (e.g. `","`).
pub fn parse_locale_decimal(raw: &str) -> Option<Decimal> {
    let normalized = raw.trim().replace('.', "").replacen(',', ".", 1);
    let caps = NUMERIC_PREFIX_RE.captures(&normalized)?;

    let sign = caps.get(1).map_or("", |m| m.as_str());
    let int = caps.get(2).map_or("", |m| m.as_str());
    let frac = caps.get(3).map(|m| m.as_str());
    let number = match (int.is_empty(), frac) {
        (true, None) => return None,
        (true, Some(frac)) => format!("{}0.{}", sign, frac),
        (false, Some(frac)) => format!("{}{}.{}", sign, int, frac),
        (false, None) => format!("{}{}", sign, int),
    };
    Decimal::from_str(&number).ok()
}

/// Like [`parse_locale_decimal`] for fields that default to zero when unreadable.
pub fn locale_decimal_or_zero(raw: Option<&str>, field: &str) -> Decimal {
    let Some(raw) = raw else {
        return Decimal::ZERO;
    };
    parse_locale_decimal(raw).unwrap_or_else(|| {
        tracing::warn!("Unreadable amount '{}' for {}, using 0", raw, field);
        Decimal::ZERO
    })
}

// src/extractors/rows.rs
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rust_decimal::Decimal;

use crate::contract::models::{Beneficiary, SENTINEL_DATE};
use crate::extractors::locale::parse_locale_decimal;
use crate::utils::config::AmountPolicy;
use crate::utils::error::ExtractError;

// <unit> <NAME> FD <n> <guarantor date> <borrower date> <expected> <paid>
pub(crate) static BENEFICIARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([0-9]+)\s+([A-Z\s]+?)\s+(FD\s+[0-9]+)\s+([0-9]{2}/[0-9]{2}/[0-9]{4})\s+([0-9]{2}/[0-9]{2}/[0-9]{4})\s+([0-9.,]+)\s+([0-9.,]+)",
    )
    .expect("Failed to compile BENEFICIARY_RE")
});

fn optional_date(raw: &str) -> Option<String> {
    if raw == SENTINEL_DATE {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Resolves one amount column under the configured policy.
/// `Ok(None)` means the row should be dropped.
fn row_amount(
    raw: &str,
    column: &str,
    unit: &str,
    policy: AmountPolicy,
) -> Result<Option<Decimal>, ExtractError> {
    if let Some(value) = parse_locale_decimal(raw) {
        return Ok(Some(value));
    }
    match policy {
        AmountPolicy::Zero => {
            tracing::warn!("Unreadable {} '{}' for unit {}, using 0", column, raw, unit);
            Ok(Some(Decimal::ZERO))
        }
        AmountPolicy::SkipRow => {
            tracing::warn!("Unreadable {} '{}' for unit {}, skipping row", column, raw, unit);
            Ok(None)
        }
        AmountPolicy::Reject => Err(ExtractError::ExtractionError(format!(
            "malformed {} '{}' in row for contract unit {}",
            column, raw, unit
        ))),
    }
}

fn beneficiary_from(caps: &Captures<'_>, policy: AmountPolicy) -> Result<Option<Beneficiary>, ExtractError> {
    // All seven groups are mandatory in the pattern.
    let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
    let unit = group(1);

    let Some(expected) = row_amount(group(6), "expected value", unit, policy)? else {
        return Ok(None);
    };
    let Some(paid_by_guarantor) = row_amount(group(7), "guarantor payment", unit, policy)? else {
        return Ok(None);
    };

    Ok(Some(Beneficiary {
        contract_unit: unit.to_string(),
        name: group(2).trim().to_string(),
        reference_code: group(3).to_string(),
        guarantor_paid_on: optional_date(group(4)),
        borrower_paid_on: optional_date(group(5)),
        expected,
        paid_by_guarantor,
    }))
}

/// Scans one segment for beneficiary rows, in order of appearance.
///
/// Zero matches is a valid outcome; the assembler decides what to do with it.
pub fn extract_rows(segment: &str, policy: AmountPolicy) -> Result<Vec<Beneficiary>, ExtractError> {
    let mut rows = Vec::new();
    for caps in BENEFICIARY_RE.captures_iter(segment) {
        if let Some(row) = beneficiary_from(&caps, policy)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGMENT: &str = "15/04/2025 UND NOME RT NCPD PG FIADOR PG MUTUARIO\n\
        101 MARIA DA SILVA FD 2501 15/04/2025 15/04/2025 1.243,14 1.243,14\n\
        102 JOSE SOUZA FD 2502 15/04/2025 00/00/0000 500,00 0,00\n\
        VALOR PREVISTO : 1.743,14";

    #[test]
    fn extracts_rows_in_order_of_appearance() {
        let rows = extract_rows(SEGMENT, AmountPolicy::Zero).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].contract_unit, "101");
        assert_eq!(rows[0].name, "MARIA DA SILVA");
        assert_eq!(rows[0].reference_code, "FD 2501");
        assert_eq!(rows[0].guarantor_paid_on.as_deref(), Some("15/04/2025"));
        assert_eq!(rows[0].borrower_paid_on.as_deref(), Some("15/04/2025"));
        assert_eq!(rows[0].expected, Decimal::new(124314, 2));

        assert_eq!(rows[1].contract_unit, "102");
        assert_eq!(rows[1].name, "JOSE SOUZA");
        assert_eq!(rows[1].paid_by_guarantor, Decimal::ZERO);
    }

    #[test]
    fn sentinel_borrower_date_is_absent() {
        let rows = extract_rows(SEGMENT, AmountPolicy::Zero).unwrap();
        assert_eq!(rows[1].borrower_paid_on, None);
    }

    #[test]
    fn segment_without_rows_is_empty_not_an_error() {
        let rows = extract_rows("15/05/2025 VALOR PREVISTO : 0,00", AmountPolicy::Reject).unwrap();
        assert!(rows.is_empty());
    }

    const MALFORMED: &str = "7 ANA LIMA FD 10 01/02/2025 01/02/2025 , 10,00\n\
                             8 RUI COSTA FD 11 01/02/2025 01/02/2025 20,00 20,00";

    #[test]
    fn malformed_amount_becomes_zero_by_default() {
        let rows = extract_rows(MALFORMED, AmountPolicy::Zero).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].expected, Decimal::ZERO);
        assert_eq!(rows[0].paid_by_guarantor, Decimal::new(1000, 2));
    }

    #[test]
    fn malformed_amount_can_skip_the_row() {
        let rows = extract_rows(MALFORMED, AmountPolicy::SkipRow).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contract_unit, "8");
    }

    #[test]
    fn malformed_amount_can_reject_the_extraction() {
        let err = extract_rows(MALFORMED, AmountPolicy::Reject).unwrap_err();
        assert!(matches!(err, ExtractError::ExtractionError(_)));
        assert!(err.to_string().contains("contract unit 7"));
    }
}

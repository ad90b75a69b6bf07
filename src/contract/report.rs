// src/contract/report.rs
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::contract::models::{Beneficiary, Block, ContractData, SENTINEL_DATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    /// Only a sentinel borrower-payment date means unpaid; any other value counts as paid.
    pub fn of(beneficiary: &Beneficiary) -> Self {
        match beneficiary.borrower_paid_on.as_deref() {
            None | Some(SENTINEL_DATE) => PaymentStatus::Unpaid,
            Some(_) => PaymentStatus::Paid,
        }
    }
}

/// `part / whole * 100`, or zero when there is nothing to divide by.
fn percentage(part: Decimal, whole: Decimal, dp: u32) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        (part / whole * Decimal::ONE_HUNDRED).round_dp(dp)
    }
}

/// Totals across every block, with the derived balances shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedSummary {
    pub block_count: usize,
    pub beneficiary_count: usize,
    pub total_expected: Decimal,
    pub total_paid_by_guarantor: Decimal,
    pub total_incorporated: Decimal,
    pub total_amortized: Decimal,
    pub total_reversed: Decimal,
    /// expected − paid by guarantor
    pub outstanding_balance: Decimal,
    /// expected − amortized
    pub net_balance: Decimal,
    pub paid_percentage: Decimal,
    pub amortized_percentage: Decimal,
    pub outstanding_percentage: Decimal,
}

impl ConsolidatedSummary {
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let sum = |field: fn(&Block) -> Decimal| blocks.iter().map(field).sum::<Decimal>();

        let total_expected = sum(|b| b.totals.expected);
        let total_paid_by_guarantor = sum(|b| b.totals.paid_by_guarantor);
        let total_amortized = sum(|b| b.totals.amortized);
        let outstanding_balance = total_expected - total_paid_by_guarantor;

        Self {
            block_count: blocks.len(),
            beneficiary_count: blocks.iter().map(|b| b.beneficiaries.len()).sum(),
            total_expected,
            total_paid_by_guarantor,
            total_incorporated: sum(|b| b.totals.incorporated),
            total_amortized,
            total_reversed: sum(|b| b.totals.reversed),
            outstanding_balance,
            net_balance: total_expected - total_amortized,
            paid_percentage: percentage(total_paid_by_guarantor, total_expected, 2),
            amortized_percentage: percentage(total_amortized, total_expected, 2),
            outstanding_percentage: percentage(outstanding_balance, total_expected, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub reference_date: String,
    pub expected: Decimal,
    pub paid: Decimal,
    pub status: PaymentStatus,
    pub payment_date: Option<String>,
}

/// Every appearance of one contract unit across the blocks of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryHistory {
    pub contract_unit: String,
    pub name: String,
    pub entries: Vec<HistoryEntry>,
    pub total_expected: Decimal,
    pub total_paid: Decimal,
    pub payment_rate: Decimal,
}

/// Drill-down for one contract unit. The document is passed in explicitly.
pub fn beneficiary_history(data: &ContractData, contract_unit: &str) -> Option<BeneficiaryHistory> {
    let mut name = String::new();
    let mut entries = Vec::new();

    for block in &data.blocks {
        for row in block.beneficiaries.iter().filter(|r| r.contract_unit == contract_unit) {
            name = row.name.clone();
            entries.push(HistoryEntry {
                reference_date: block.reference_date.clone(),
                expected: row.expected,
                paid: row.paid_by_guarantor,
                status: PaymentStatus::of(row),
                payment_date: row.borrower_paid_on.clone(),
            });
        }
    }

    if entries.is_empty() {
        return None;
    }

    let total_expected: Decimal = entries.iter().map(|e| e.expected).sum();
    let total_paid: Decimal = entries.iter().map(|e| e.paid).sum();
    Some(BeneficiaryHistory {
        contract_unit: contract_unit.to_string(),
        name,
        entries,
        total_expected,
        total_paid,
        payment_rate: percentage(total_paid, total_expected, 1),
    })
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompetencyError {
    #[error("expected a date as dd/mm/yyyy, got '{0}'")]
    InvalidFormat(String),

    #[error("competency {0} not found in the data")]
    NotFound(String),
}

/// Finds the block index for a user-typed reference date.
///
/// Non-digits are ignored, so `15/08/2025`, `15-08-2025` and `15082025` are the same query.
pub fn find_competency(data: &ContractData, input: &str) -> Result<usize, CompetencyError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 8 {
        return Err(CompetencyError::InvalidFormat(input.to_string()));
    }
    let wanted = format!("{}/{}/{}", &digits[0..2], &digits[2..4], &digits[4..8]);

    data.blocks
        .iter()
        .position(|b| b.reference_date == wanted)
        .ok_or(CompetencyError::NotFound(wanted))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPoint {
    pub reference_date: String,
    pub expected: Decimal,
    pub paid: Decimal,
}

/// Expected vs. paid per block, in block order.
pub fn period_series(data: &ContractData) -> Vec<PeriodPoint> {
    data.blocks
        .iter()
        .map(|b| PeriodPoint {
            reference_date: b.reference_date.clone(),
            expected: b.totals.expected,
            paid: b.totals.paid_by_guarantor,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::models::{ContractInfo, Totals};

    fn row(unit: &str, name: &str, borrower: Option<&str>, expected: i64, paid: i64) -> Beneficiary {
        Beneficiary {
            contract_unit: unit.to_string(),
            name: name.to_string(),
            reference_code: "FD 1".to_string(),
            guarantor_paid_on: None,
            borrower_paid_on: borrower.map(str::to_string),
            expected: Decimal::new(expected, 2),
            paid_by_guarantor: Decimal::new(paid, 2),
        }
    }

    fn block(id: usize, date: &str, rows: Vec<Beneficiary>, expected: i64, paid: i64, amortized: i64) -> Block {
        Block {
            block_id: id,
            reference_date: date.to_string(),
            beneficiaries: rows,
            totals: Totals {
                expected: Decimal::new(expected, 2),
                paid_by_guarantor: Decimal::new(paid, 2),
                incorporated: Decimal::new(paid, 2),
                amortized: Decimal::new(amortized, 2),
                reversed: Decimal::ZERO,
            },
        }
    }

    fn sample() -> ContractData {
        ContractData {
            contract_info: ContractInfo {
                contract_number: Some("123".into()),
                contract_name: Some("ACME".into()),
                total_balance: Decimal::ZERO,
                installment_difference: Decimal::ZERO,
                pending_complement: Decimal::ZERO,
                last_update: None,
                emitter: None,
            },
            blocks: vec![
                block(1, "15/04/2025", vec![row("101", "ANA", Some("15/04/2025"), 24314, 24314)], 24314, 24314, 0),
                block(
                    2,
                    "15/05/2025",
                    vec![
                        row("101", "ANA LIMA", None, 10000, 0),
                        row("102", "RUI", Some("99/99/9999"), 79896, 79896),
                    ],
                    89896,
                    79896,
                    10000,
                ),
            ],
        }
    }

    #[test]
    fn payment_status_follows_the_borrower_date() {
        assert_eq!(PaymentStatus::of(&row("1", "A", None, 0, 0)), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::of(&row("1", "A", Some("00/00/0000"), 0, 0)), PaymentStatus::Unpaid);
        assert_eq!(PaymentStatus::of(&row("1", "A", Some("15/04/2025"), 0, 0)), PaymentStatus::Paid);
        // Malformed dates still count as paid.
        assert_eq!(PaymentStatus::of(&row("1", "A", Some("99/99/9999"), 0, 0)), PaymentStatus::Paid);
    }

    #[test]
    fn consolidated_summary_sums_block_totals() {
        let summary = ConsolidatedSummary::from_blocks(&sample().blocks);
        assert_eq!(summary.block_count, 2);
        assert_eq!(summary.beneficiary_count, 3);
        assert_eq!(summary.total_expected, Decimal::new(114210, 2));
        assert_eq!(summary.total_paid_by_guarantor, Decimal::new(104210, 2));
        assert_eq!(summary.outstanding_balance, Decimal::new(10000, 2));
        assert_eq!(summary.net_balance, Decimal::new(104210, 2));
        assert_eq!(summary.paid_percentage, Decimal::new(9124, 2));
        assert_eq!(summary.amortized_percentage, Decimal::new(876, 2));
    }

    #[test]
    fn empty_summary_has_zero_percentages() {
        let summary = ConsolidatedSummary::from_blocks(&[]);
        assert_eq!(summary.total_expected, Decimal::ZERO);
        assert_eq!(summary.paid_percentage, Decimal::ZERO);
        assert_eq!(summary.outstanding_percentage, Decimal::ZERO);
    }

    #[test]
    fn history_collects_the_unit_across_blocks() {
        let history = beneficiary_history(&sample(), "101").unwrap();
        assert_eq!(history.name, "ANA LIMA");
        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[0].status, PaymentStatus::Paid);
        assert_eq!(history.entries[1].status, PaymentStatus::Unpaid);
        assert_eq!(history.entries[1].payment_date, None);
        assert_eq!(history.total_expected, Decimal::new(34314, 2));
        assert_eq!(history.total_paid, Decimal::new(24314, 2));
        assert_eq!(history.payment_rate, Decimal::new(709, 1));
    }

    #[test]
    fn history_of_unknown_unit_is_none() {
        assert!(beneficiary_history(&sample(), "999").is_none());
    }

    #[test]
    fn competency_accepts_any_separator() {
        let data = sample();
        assert_eq!(find_competency(&data, "15/05/2025"), Ok(1));
        assert_eq!(find_competency(&data, "15052025"), Ok(1));
        assert_eq!(find_competency(&data, "15-04-2025"), Ok(0));
    }

    #[test]
    fn competency_errors() {
        let data = sample();
        assert_eq!(
            find_competency(&data, "31/12/2025"),
            Err(CompetencyError::NotFound("31/12/2025".into()))
        );
        assert_eq!(
            find_competency(&data, "15/05/25"),
            Err(CompetencyError::InvalidFormat("15/05/25".into()))
        );
    }

    #[test]
    fn period_series_follows_block_order() {
        let series = period_series(&sample());
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].reference_date, "15/05/2025");
        assert_eq!(series[1].expected, Decimal::new(89896, 2));
        assert_eq!(series[1].paid, Decimal::new(79896, 2));
    }
}

// src/contract/models.rs
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Written in place of any text field the document did not provide.
pub const UNKNOWN: &str = "DESCONHECIDO";
/// Written in place of a missing date; on a borrower-payment date it means "unpaid".
pub const SENTINEL_DATE: &str = "00/00/0000";

/// Contract-level scalars taken from the document header.
///
/// Absent text fields are `None` here and become `DESCONHECIDO` / `00/00/0000`
/// only when serialized, so the JSON matches what the dashboard already reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    #[serde(with = "unknown_text")]
    pub contract_number: Option<String>,
    #[serde(with = "unknown_text")]
    pub contract_name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_balance: Decimal,
    #[serde(rename = "difPrestacao", with = "rust_decimal::serde::float")]
    pub installment_difference: Decimal,
    /// Never populated by the extractor; kept for output compatibility.
    #[serde(rename = "pendVrComplem", with = "rust_decimal::serde::float")]
    pub pending_complement: Decimal,
    #[serde(rename = "lastDailyDate", with = "sentinel_date")]
    pub last_update: Option<String>,
    #[serde(with = "unknown_text")]
    pub emitter: Option<String>,
}

impl ContractInfo {
    /// True when a `CONTRATO <digits>` header was found.
    pub fn is_recognized(&self) -> bool {
        self.contract_number.is_some()
    }

    pub fn contract_number_or_unknown(&self) -> &str {
        self.contract_number.as_deref().unwrap_or(UNKNOWN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Contract unit id. Numeric-looking, but kept as opaque text.
    #[serde(rename = "contractUnd")]
    pub contract_unit: String,
    pub name: String,
    /// `FD <digits>` reference code.
    #[serde(rename = "rtNcpd")]
    pub reference_code: String,
    #[serde(rename = "pgFiador", with = "sentinel_date")]
    pub guarantor_paid_on: Option<String>,
    #[serde(rename = "pgMutuario", with = "sentinel_date")]
    pub borrower_paid_on: Option<String>,
    #[serde(rename = "vrPrevisto", with = "rust_decimal::serde::float")]
    pub expected: Decimal,
    #[serde(rename = "vrPagoFiador", with = "rust_decimal::serde::float")]
    pub paid_by_guarantor: Decimal,
}

/// Aggregate figures printed under each block. Extracted independently of the rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "vrPrevisto", with = "rust_decimal::serde::float")]
    pub expected: Decimal,
    #[serde(rename = "vrPagoFiador", with = "rust_decimal::serde::float")]
    pub paid_by_guarantor: Decimal,
    #[serde(rename = "vrIncorporado", with = "rust_decimal::serde::float")]
    pub incorporated: Decimal,
    #[serde(rename = "vrAmortizado", with = "rust_decimal::serde::float")]
    pub amortized: Decimal,
    #[serde(rename = "vrEstornado", with = "rust_decimal::serde::float")]
    pub reversed: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// 1-based, dense over the blocks that were kept.
    pub block_id: usize,
    pub reference_date: String,
    pub beneficiaries: Vec<Beneficiary>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractData {
    pub contract_info: ContractInfo,
    pub blocks: Vec<Block>,
}

impl ContractData {
    pub fn beneficiary_count(&self) -> usize {
        self.blocks.iter().map(|b| b.beneficiaries.len()).sum()
    }

    pub fn reference_dates(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.reference_date.as_str()).collect()
    }
}

fn from_sentinel(raw: String, sentinel: &str) -> Option<String> {
    if raw == sentinel {
        None
    } else {
        Some(raw)
    }
}

mod unknown_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(super::UNKNOWN))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(super::from_sentinel(String::deserialize(d)?, super::UNKNOWN))
    }
}

mod sentinel_date {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(super::SENTINEL_DATE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(super::from_sentinel(String::deserialize(d)?, super::SENTINEL_DATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unknown_header() -> ContractInfo {
        ContractInfo {
            contract_number: None,
            contract_name: None,
            total_balance: Decimal::ZERO,
            installment_difference: Decimal::ZERO,
            pending_complement: Decimal::ZERO,
            last_update: None,
            emitter: None,
        }
    }

    #[test]
    fn absent_fields_serialize_as_sentinels() {
        let value = serde_json::to_value(unknown_header()).unwrap();
        assert_eq!(value["contractNumber"], "DESCONHECIDO");
        assert_eq!(value["contractName"], "DESCONHECIDO");
        assert_eq!(value["emitter"], "DESCONHECIDO");
        assert_eq!(value["lastDailyDate"], "00/00/0000");
        assert_eq!(value["difPrestacao"], json!(0.0));
    }

    #[test]
    fn sentinels_deserialize_as_absent() {
        let raw = json!({
            "contractUnd": "101",
            "name": "MARIA SOUZA",
            "rtNcpd": "FD 2501",
            "pgFiador": "15/04/2025",
            "pgMutuario": "00/00/0000",
            "vrPrevisto": 243.14,
            "vrPagoFiador": 0.0
        });
        let row: Beneficiary = serde_json::from_value(raw).unwrap();
        assert_eq!(row.guarantor_paid_on.as_deref(), Some("15/04/2025"));
        assert_eq!(row.borrower_paid_on, None);
        assert_eq!(row.expected.round_dp(2), Decimal::new(24314, 2));
    }

    #[test]
    fn recognized_header_reports_its_number() {
        let mut info = unknown_header();
        assert!(!info.is_recognized());
        assert_eq!(info.contract_number_or_unknown(), UNKNOWN);

        info.contract_number = Some("123".into());
        assert!(info.is_recognized());
        assert_eq!(info.contract_number_or_unknown(), "123");
    }
}

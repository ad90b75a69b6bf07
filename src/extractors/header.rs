// src/extractors/header.rs
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::contract::models::ContractInfo;
use crate::extractors::locale::locale_decimal_or_zero;

// --- Header Patterns (Lazy Static) ---
// Each one is searched independently over the whole text, so field order in the document does not matter.
pub(crate) static CONTRACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CONTRATO\s+([0-9]+)\s+([A-Z\s]+)").expect("Failed to compile CONTRACT_RE")
});

pub(crate) static TOTAL_BALANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"SALDO\s+DEV\s+TOTAL\s*:\s*([0-9.,]+)").expect("Failed to compile TOTAL_BALANCE_RE")
});

pub(crate) static INSTALLMENT_DIFF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"DIF\s+PRESTACAO\s*:\s*([-0-9.,]+)").expect("Failed to compile INSTALLMENT_DIFF_RE")
});

pub(crate) static LAST_UPDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ULTIMA\s+DIARIA\s*:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})").expect("Failed to compile LAST_UPDATE_RE")
});

pub(crate) static EMITTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Emitente:\s*([0-9]+)").expect("Failed to compile EMITTER_RE")
});

fn first_group<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// Pulls the contract-level fields out of the full document text.
///
/// Never fails: every field that is missing or unreadable gets its default.
pub fn extract_header(text: &str) -> ContractInfo {
    let (contract_number, contract_name) = match CONTRACT_RE.captures(text) {
        Some(caps) => {
            let number = caps.get(1).map(|m| m.as_str().to_string());
            let name = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            (number, name)
        }
        None => {
            tracing::debug!("No CONTRATO header found");
            (None, None)
        }
    };

    let info = ContractInfo {
        contract_number,
        contract_name,
        total_balance: locale_decimal_or_zero(first_group(&TOTAL_BALANCE_RE, text), "SALDO DEV TOTAL"),
        installment_difference: locale_decimal_or_zero(first_group(&INSTALLMENT_DIFF_RE, text), "DIF PRESTACAO"),
        pending_complement: Decimal::ZERO,
        last_update: first_group(&LAST_UPDATE_RE, text).map(str::to_string),
        emitter: first_group(&EMITTER_RE, text).map(str::to_string),
    };

    tracing::debug!(
        "Header: contract={:?} name={:?} emitter={:?} last_update={:?}",
        info.contract_number,
        info.contract_name,
        info.emitter,
        info.last_update
    );
    info
}

// src/extractors/totals.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::contract::models::Totals;
use crate::extractors::locale::locale_decimal_or_zero;

static TOTALS_RE: Lazy<[(&'static str, Regex); 5]> = Lazy::new(|| {
    let labeled = |label: &'static str, pattern: &str| {
        (label, Regex::new(pattern).expect("Failed to compile TOTALS_RE"))
    };
    [
        labeled("VALOR PREVISTO", r"VALOR\s+PREVISTO\s*:\s*([0-9.,]+)"),
        labeled("VALOR PAGO FIADOR", r"VALOR\s+PAGO\s+FIADOR\s*:\s*([0-9.,]+)"),
        labeled("VALOR INCORPORADO", r"VALOR\s+INCORPORADO\s*:\s*([0-9.,]+)"),
        labeled("VALOR AMORTIZADO", r"VALOR\s+AMORTIZADO\s*:\s*([0-9.,]+)"),
        labeled("VALOR ESTORNADO", r"VALOR\s+ESTORNADO\s*:\s*([0-9.,]+)"),
    ]
});

/// The five labeled totals of one segment. Each is 0 when its label is absent.
pub fn extract_totals(segment: &str) -> Totals {
    let [expected, paid, incorporated, amortized, reversed] = TOTALS_RE.each_ref().map(|(label, re)| {
        let raw = re.captures(segment).and_then(|caps| caps.get(1)).map(|m| m.as_str());
        locale_decimal_or_zero(raw, label)
    });

    Totals {
        expected,
        paid_by_guarantor: paid,
        incorporated,
        amortized,
        reversed,
    }
}

/// Label patterns, for the debug annotator.
pub(crate) fn total_patterns() -> impl Iterator<Item = &'static Regex> {
    TOTALS_RE.iter().map(|(_, re)| re)
}

// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use regex::Regex;

use crate::extractors::{header, rows, segment, totals};
use crate::utils::error::AppError;

/// Wraps every highlighted span as `[[kind|text]]`.
/// Spans overlapping an earlier (already written) span are dropped.
pub fn annotate_text(text: &str, highlights: &[(usize, usize, &str)]) -> String {
    let mut sorted = highlights.to_vec();
    sorted.sort_by_key(|h| (h.0, std::cmp::Reverse(h.1))); // Sort by position, longest first

    let mut annotated = String::with_capacity(text.len() + highlights.len() * 16);
    let mut last_pos = 0;
    for (start, end, kind) in sorted {
        if start < last_pos {
            continue;
        }
        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(&format!("[[{}|{}]]", kind, &text[start..end]));
        last_pos = end;
    }
    annotated.push_str(&text[last_pos..]);
    annotated
}

/// Collects the matches of each pattern under its label.
pub fn collect_highlights<'a>(text: &str, patterns: &[(&'a Regex, &'a str)]) -> Vec<(usize, usize, &'a str)> {
    patterns
        .iter()
        .flat_map(|(re, kind)| re.find_iter(text).map(move |m| (m.start(), m.end(), *kind)))
        .collect()
}

/// Saves the annotated extraction text, marking header fields, rows, totals and date anchors.
pub fn save_debug_text(text: &str, filename: &Path) -> Result<(), AppError> {
    let mut patterns: Vec<(&Regex, &str)> = vec![
        (&*header::CONTRACT_RE, "contract"),
        (&*header::TOTAL_BALANCE_RE, "balance"),
        (&*header::INSTALLMENT_DIFF_RE, "difference"),
        (&*header::LAST_UPDATE_RE, "last-update"),
        (&*header::EMITTER_RE, "emitter"),
        (&*rows::BENEFICIARY_RE, "row"),
    ];
    patterns.extend(totals::total_patterns().map(|re| (re, "total")));
    patterns.push((&*segment::DATE_RE, "date"));

    let highlights = collect_highlights(text, &patterns);
    let mut file = File::create(filename)?;
    file.write_all(annotate_text(text, &highlights).as_bytes())?;

    tracing::info!("Saved debug text with {} highlights to {}", highlights.len(), filename.display());
    Ok(())
}

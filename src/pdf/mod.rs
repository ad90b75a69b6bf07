// src/pdf/mod.rs
use lopdf::Document;
use percent_encoding::percent_decode_str;

use crate::utils::error::ExtractError;

/// Reads a PDF and flattens its text into one string.
///
/// Pages are joined with `\n` and text runs within a page with a single space,
/// in reading order. A page whose content cannot be decoded contributes no runs.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(bytes)
        .map_err(|e| ExtractError::DocumentParseError(e.to_string()))?;

    let pages = document.get_pages();
    tracing::debug!("PDF loaded with {} pages", pages.len());

    let page_runs: Vec<Vec<String>> = pages
        .keys()
        .map(|&page_number| match document.extract_text(&[page_number]) {
            Ok(page_text) => split_runs(&page_text),
            Err(e) => {
                tracing::warn!("No text extracted from page {}: {}", page_number, e);
                Vec::new()
            }
        })
        .collect();

    Ok(join_pages(&page_runs))
}

/// Async entry point; the PDF work runs on tokio's blocking pool.
pub async fn acquire_text(bytes: Vec<u8>) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text_from_pdf(&bytes))
        .await
        .map_err(|e| ExtractError::DocumentParseError(format!("text extraction task failed: {}", e)))?
}

/// Each non-blank line of a page's extracted text is one run.
fn split_runs(page_text: &str) -> Vec<String> {
    page_text
        .lines()
        .map(str::trim)
        .filter(|run| !run.is_empty())
        .map(str::to_string)
        .collect()
}

/// Percent-escapes (`%20`, `%C3%A7`) are decoded; anything that is not a valid escape is kept as is.
fn decode_run(run: &str) -> String {
    percent_decode_str(run).decode_utf8_lossy().into_owned()
}

fn join_pages(pages: &[Vec<String>]) -> String {
    let mut full_text = String::new();
    for runs in pages {
        for run in runs {
            full_text.push_str(&decode_run(run));
            full_text.push(' ');
        }
        full_text.push('\n');
    }
    full_text
}

// src/extractors/segment.rs
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{2}/[0-9]{2}/[0-9]{4}").expect("Failed to compile DATE_RE")
});

/// First occurrence of a distinct date string in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAnchor<'t> {
    pub date: &'t str,
    pub offset: usize,
}

/// Text span that belongs to one reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'t> {
    pub date: &'t str,
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

/// Pass 1: every distinct `dd/mm/yyyy` string, in order of first occurrence.
pub fn find_date_anchors(text: &str) -> Vec<DateAnchor<'_>> {
    let mut seen = HashSet::new();
    DATE_RE
        .find_iter(text)
        .filter(|m| seen.insert(m.as_str()))
        .map(|m| DateAnchor { date: m.as_str(), offset: m.start() })
        .collect()
}

/// Pass 2: slices the text into one segment per anchor.
///
/// A segment runs from its date's first occurrence up to the next occurrence of the
/// following distinct date, or to the end of the text when that date does not recur.
pub fn segment_by_anchors<'t>(text: &'t str, anchors: &[DateAnchor<'t>]) -> Vec<Segment<'t>> {
    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let start = anchor.offset;
            // Search past this anchor's own date; its end is always a char boundary.
            let from = start + anchor.date.len();
            let end = anchors
                .get(i + 1)
                .and_then(|next| text[from..].find(next.date).map(|pos| from + pos))
                .unwrap_or(text.len());
            Segment { date: anchor.date, start, end, text: &text[start..end] }
        })
        .collect()
}

/// Both passes in one call.
pub fn segment_text(text: &str) -> Vec<Segment<'_>> {
    let anchors = find_date_anchors(text);
    tracing::debug!("Found {} distinct date anchors", anchors.len());
    segment_by_anchors(text, &anchors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_are_distinct_and_in_first_seen_order() {
        let text = "15/05/2025 a 15/04/2025 b 15/05/2025 c 16/06/2025";
        let anchors = find_date_anchors(text);
        let dates: Vec<_> = anchors.iter().map(|a| a.date).collect();
        assert_eq!(dates, vec!["15/05/2025", "15/04/2025", "16/06/2025"]);
        assert_eq!(anchors[1].offset, text.find("15/04/2025").unwrap());
    }

    #[test]
    fn segments_are_contiguous_up_to_the_next_date() {
        let text = "head 15/04/2025 first 15/05/2025 second";
        let segments = segment_text(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "15/04/2025 first ");
        assert_eq!(segments[1].text, "15/05/2025 second");
        assert_eq!(segments[0].end, segments[1].start);
        assert_eq!(segments[1].end, text.len());
    }

    #[test]
    fn repeated_date_does_not_open_a_new_segment() {
        let text = "15/04/2025 x 15/04/2025 y 15/05/2025 z";
        let segments = segment_text(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "15/04/2025 x 15/04/2025 y ");
    }

    #[test]
    fn missing_terminator_runs_to_end_of_text() {
        // The next anchor's date is never found after this start.
        let text = "01/01/2025 alpha";
        let anchors = vec![
            DateAnchor { date: "01/01/2025", offset: 0 },
            DateAnchor { date: "02/02/2025", offset: 0 },
        ];
        let segments = segment_by_anchors(text, &anchors);
        assert_eq!(segments[0].end, text.len());
        assert_eq!(segments[0].text, text);
    }

    #[test]
    fn non_ascii_digits_are_not_dates() {
        let text = "\u{661}\u{662}/\u{661}\u{662}/\u{662}\u{660}\u{662}\u{665} x \u{661}\u{663}/\u{661}\u{662}/\u{662}\u{660}\u{662}\u{665} y";
        assert!(find_date_anchors(text).is_empty());
        assert!(segment_text(text).is_empty());
    }

    #[test]
    fn multibyte_text_around_dates_is_sliced_cleanly() {
        let text = "ção 15/04/2025 João 15/05/2025 é";
        let segments = segment_text(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "15/04/2025 João ");
        assert_eq!(segments[1].text, "15/05/2025 é");
    }

    #[test]
    fn text_without_dates_has_no_segments() {
        assert!(segment_text("CONTRATO 123 ACME").is_empty());
    }
}

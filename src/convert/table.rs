//! Tabular region detection and pipe-row emission.
//!
//! A line becomes a table-cell candidate list by splitting on `|` when pipes
//! are present, otherwise on runs of two or more whitespace characters or
//! tabs. Neighbor lines are tokenized with the same rule when deciding
//! whether a region is tabular.

use regex::Regex;
use std::sync::LazyLock;

static COLUMN_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}|\t+").unwrap());

/// Splits a line into cell segments.
///
/// Pipe-delimited lines split on `|` with empty cells dropped; anything else
/// splits on column gaps (2+ spaces or tabs). Segments keep incidental single
/// spaces; they are trimmed at row emission.
pub(crate) fn segments(line: &str) -> Vec<&str> {
    if line.contains('|') {
        line.split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        COLUMN_GAP
            .split(line)
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// Whether a line in normal mode opens a tabular region.
///
/// Requires 2+ segments, plus either a neighbor with the same segment count
/// or multi-segment lines on both sides.
pub(crate) fn looks_like_row(current: &[&str], prev: &[&str], next: &[&str]) -> bool {
    current.len() > 1
        && (current.len() == next.len()
            || current.len() == prev.len()
            || (prev.len() > 1 && next.len() > 1))
}

/// Formats cell segments as a pipe-delimited Markdown row.
pub(crate) fn format_row(cells: &[&str]) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell.trim());
        row.push_str(" |");
    }
    row
}

/// Formats the `|---|---|` header separator for the given column count.
pub(crate) fn format_separator(columns: usize) -> String {
    let mut row = String::from("|");
    for _ in 0..columns {
        row.push_str("---|");
    }
    row
}

/// Whether a table opener should be treated as a header row.
///
/// True when the table starts the document, or follows a blank line and at
/// least one cell starts with an uppercase letter.
pub(crate) fn wants_separator(is_first_line: bool, prev_blank: bool, cells: &[&str]) -> bool {
    is_first_line
        || (prev_blank
            && cells
                .iter()
                .any(|c| c.trim().starts_with(|ch: char| ch.is_ascii_uppercase())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_space_separated() {
        assert_eq!(segments("Name    Age    City"), vec!["Name", "Age", "City"]);
    }

    #[test]
    fn test_segments_tab_separated() {
        assert_eq!(segments("Name\tAge\tCity"), vec!["Name", "Age", "City"]);
    }

    #[test]
    fn test_segments_pipe_separated() {
        assert_eq!(segments("| a | b | c |"), vec!["a", "b", "c"]);
        assert_eq!(segments("a|b"), vec!["a", "b"]);
    }

    #[test]
    fn test_segments_single_spaces_not_split() {
        assert_eq!(segments("just a sentence"), vec!["just a sentence"]);
    }

    #[test]
    fn test_segments_blank_line() {
        assert!(segments("").is_empty());
        assert!(segments("   ").is_empty());
    }

    #[test]
    fn test_looks_like_row_matches_neighbor_count() {
        let current = vec!["a", "b", "c"];
        let next = vec!["x", "y", "z"];
        assert!(looks_like_row(&current, &[], &next));
        assert!(looks_like_row(&current, &next, &[]));
    }

    #[test]
    fn test_looks_like_row_both_neighbors_multi() {
        // Segment counts differ everywhere, but both neighbors are
        // multi-segment, which still reads as tabular.
        let current = vec!["a", "b", "c"];
        let prev = vec!["x", "y"];
        let next = vec!["p", "q", "r", "s"];
        assert!(looks_like_row(&current, &prev, &next));
    }

    #[test]
    fn test_looks_like_row_rejects_single_segment() {
        let current = vec!["only one"];
        let next = vec!["only one"];
        assert!(!looks_like_row(&current, &[], &next));
    }

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&["a", "b"]), "| a | b |");
    }

    #[test]
    fn test_format_separator() {
        assert_eq!(format_separator(3), "|---|---|---|");
    }

    #[test]
    fn test_wants_separator_first_line() {
        assert!(wants_separator(true, false, &["x", "y"]));
    }

    #[test]
    fn test_wants_separator_after_blank_with_uppercase_cell() {
        assert!(wants_separator(false, true, &["Name", "age"]));
        assert!(!wants_separator(false, true, &["name", "age"]));
        assert!(!wants_separator(false, false, &["Name", "Age"]));
    }
}

//! Normalization passes around the conversion scan.
//!
//! Two small stages:
//!
//! 1. **Input pre-pass** - Unicode NFC normalization, line-ending
//!    normalization, control-character removal. Pasted rich text often
//!    carries decomposed accents, BOMs, and soft hyphens that would confuse
//!    the line heuristics.
//! 2. **Output post-pass** - collapse runs of three or more newlines down to
//!    exactly two, so blocks are separated by at most one blank line.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static EXCESS_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalizes raw pasted text before conversion.
///
/// Applies Unicode NFC, converts CRLF/CR line endings to LF, and drops
/// control characters that carry no content. Plain ASCII text passes through
/// unchanged.
pub fn normalize_input(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.nfc().peekable();

    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() != Some(&'\n') {
                result.push('\n');
            }
            continue;
        }
        if is_control_char(c) {
            continue;
        }
        result.push(c);
    }

    result
}

/// Control characters removed by the input pre-pass.
fn is_control_char(c: char) -> bool {
    matches!(
        c,
        '\0'        // Null
        | '\x0B'    // Vertical Tab
        | '\x0C'    // Form Feed
        | '\u{FEFF}' // BOM
        | '\u{FFFD}' // Replacement character
        | '\u{00AD}' // Soft hyphen
    )
}

/// Collapses any run of 3+ consecutive newlines down to exactly 2.
pub fn collapse_blank_lines(output: &str) -> String {
    EXCESS_BLANK_LINES.replace_all(output, "\n\n").into_owned()
}

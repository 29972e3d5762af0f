//! Heuristic plain-text to Markdown conversion.
//!
//! The converter is a single forward scan over lines with three mutually
//! exclusive block modes (normal, code block, table) plus a ladder of
//! line-level heuristics for headings, lists, links, emphasis, and quotes.
//! It is total over all string inputs and deterministic; the failure mode
//! for ambiguous input is imperfect Markdown, never an error.

mod engine;
mod heuristics;
mod options;
mod table;

pub use options::ConvertOptions;

use crate::cleanup;

/// Converts unstructured plain text into Markdown.
///
/// # Example
///
/// ```
/// use pastemark::convert;
///
/// let markdown = convert("SHOPPING LIST\n\n• milk\n• eggs");
/// assert!(markdown.starts_with("# SHOPPING LIST"));
/// assert!(markdown.contains("- milk"));
/// ```
pub fn convert(text: &str) -> String {
    convert_with_options(text, &ConvertOptions::default())
}

/// Converts plain text into Markdown with custom options.
pub fn convert_with_options(text: &str, options: &ConvertOptions) -> String {
    let normalized;
    let input = if options.normalize_input {
        normalized = cleanup::normalize_input(text);
        normalized.as_str()
    } else {
        text
    };

    let output = engine::run(input);

    if options.collapse_blank_lines {
        cleanup::collapse_blank_lines(&output)
    } else {
        output
    }
}

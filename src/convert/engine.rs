//! The forward-scan conversion engine.
//!
//! One pass over the input lines with three mutually exclusive modes:
//! normal, code block, table. Closing a block re-evaluates the line that
//! closed it under normal mode, so the loop is index-based and block-closing
//! arms simply do not advance the cursor instead of mutating it backwards.
//!
//! Rule priority per line: code-block detection, then table detection, then
//! the normal-mode heuristics. A line is interpreted as exactly one of
//! {code content, table row, heading, body line} per pass.

use super::heuristics::{self, LineContext};
use super::table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    CodeBlock,
    Table,
}

/// Runs the conversion pass and returns the joined output.
pub(crate) fn run(text: &str) -> String {
    let text = text.trim_end();
    let all_lines: Vec<&str> = text.split('\n').collect();
    let mut lines: &[&str] = &all_lines;

    // Drop leading blank lines so the first-line rules see the first content
    // line, without touching its indentation.
    while let [first, rest @ ..] = lines {
        if !first.trim().is_empty() {
            break;
        }
        lines = rest;
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut mode = Mode::Normal;
    let mut code_buf: Vec<String> = Vec::new();
    let mut table_buf: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let prev = if i > 0 { lines[i - 1] } else { "" };
        let next = lines.get(i + 1).copied().unwrap_or("");
        let trimmed = line.trim();
        let indented = is_indented(line);

        if mode == Mode::CodeBlock {
            if indented {
                code_buf.push(strip_indent(line).to_string());
                i += 1;
            } else {
                flush_code(&mut code_buf, &mut out);
                mode = Mode::Normal;
                // Reprocess the closing line under normal mode.
            }
            continue;
        }

        if indented && mode == Mode::Normal {
            mode = Mode::CodeBlock;
            code_buf.push(strip_indent(line).to_string());
            i += 1;
            continue;
        }

        let segs = table::segments(line);

        if mode == Mode::Table {
            if segs.len() > 1 {
                table_buf.push(table::format_row(&segs));
                i += 1;
            } else {
                out.append(&mut table_buf);
                mode = Mode::Normal;
                if trimmed.is_empty() {
                    i += 1;
                } else {
                    out.push(String::new());
                    // Reprocess the terminating line under normal mode.
                }
            }
            continue;
        }

        let prev_segs = table::segments(prev);
        let next_segs = table::segments(next);

        if table::looks_like_row(&segs, &prev_segs, &next_segs) {
            mode = Mode::Table;
            table_buf.push(table::format_row(&segs));
            if table::wants_separator(i == 0, prev.trim().is_empty(), &segs) {
                table_buf.push(table::format_separator(segs.len()));
            }
            i += 1;
            continue;
        }

        let ctx = LineContext {
            line,
            trimmed,
            prev,
            next,
            is_first: i == 0,
        };
        out.push(heuristics::render_line(&ctx));
        i += 1;
    }

    // Input ended inside an open block: flush as the closing transition would.
    match mode {
        Mode::CodeBlock if !code_buf.is_empty() => flush_code(&mut code_buf, &mut out),
        Mode::Table if !table_buf.is_empty() => out.append(&mut table_buf),
        _ => {}
    }

    out.join("\n")
}

/// A line starting with 4+ spaces or a tab reads as code content.
fn is_indented(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

/// Strips one level of code indentation (4 spaces, else one tab).
fn strip_indent(line: &str) -> &str {
    line.strip_prefix("    ")
        .or_else(|| line.strip_prefix('\t'))
        .unwrap_or(line)
}

/// Emits the buffered code lines as a fenced block and clears the buffer.
fn flush_code(buf: &mut Vec<String>, out: &mut Vec<String>) {
    out.push("```".to_string());
    out.append(buf);
    out.push("```".to_string());
}

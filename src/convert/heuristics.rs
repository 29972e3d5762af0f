//! Normal-mode line classification and transformation.
//!
//! Two layers run over a line that is not part of a code block or table:
//!
//! 1. The heading ladder, evaluated top to bottom with the first match
//!    winning: ALL-CAPS → H1, first-line Title Case → H1, Title Case → H2,
//!    introductory colon → H2, numbered section → H3.
//! 2. If no heading rule fires, the body transforms run in a fixed order:
//!    numbered-list normalization, bullet normalization, indented-bullet
//!    nesting, bare-URL linkification, emphasis normalization, and finally
//!    block-quote prefixing.
//!
//! Several thresholds here (80-char heading limit, the ≤3-character word
//! exemption in Title Case) are tuned values; changing them changes
//! observable output.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Maximum character length for a heading candidate.
const MAX_HEADING_TEXT_LENGTH: usize = 80;

static TRAILING_PUNCT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?,;]$").unwrap());
static ALL_CAPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s]+[A-Z]$").unwrap());
static TITLE_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z\s]+$").unwrap());
static INTRODUCTORY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^:]+:$").unwrap());
static NUMBERED_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+[A-Z][^.!?]*$").unwrap());

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\d+)[.)]\s+(.+)$").unwrap());
static GLYPH_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•·▪▫◦‣⁃]\s+(.+)$").unwrap());
static STAR_BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\*\s+(.+)$").unwrap());
static INDENTED_GLYPH_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s+)[•·▪▫◦‣⁃]\s+(.+)$").unwrap());
static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^\[\]`()]+"#).unwrap());
static BOLD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());
static STAR_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static UNDERSCORE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([^_]+)_").unwrap());

/// Per-line context: the raw line plus its neighbors.
pub(crate) struct LineContext<'a> {
    /// The line as read, untrimmed.
    pub line: &'a str,
    /// The trimmed form, used by the heading rules.
    pub trimmed: &'a str,
    /// Previous input line, or "" at the start.
    pub prev: &'a str,
    /// Next input line, or "" at the end.
    pub next: &'a str,
    /// Whether this is the first line of the input.
    pub is_first: bool,
}

/// Heading level decided for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Heading {
    H1,
    H2,
    H3,
}

/// Renders a normal-mode line: a heading if one of the ladder rules fires,
/// otherwise the body transforms.
pub(crate) fn render_line(ctx: &LineContext) -> String {
    match classify_heading(ctx) {
        Some(Heading::H1) => format!("# {}", ctx.trimmed),
        Some(Heading::H2) => format!("## {}", ctx.trimmed),
        Some(Heading::H3) => format!("### {}", ctx.trimmed),
        None => transform_body_line(ctx),
    }
}

/// The generic heading-candidate test: short, no trailing punctuation,
/// followed by content, and isolated from the paragraph above.
fn looks_like_title(ctx: &LineContext) -> bool {
    !ctx.trimmed.is_empty()
        && ctx.trimmed.chars().count() < MAX_HEADING_TEXT_LENGTH
        && !TRAILING_PUNCT.is_match(ctx.trimmed)
        && !ctx.next.trim().is_empty()
        && (ctx.is_first || ctx.prev.trim().is_empty())
}

/// Title Case: alphabetic with an uppercase start, and every word either
/// capitalized or at most 3 characters.
fn is_title_case(trimmed: &str) -> bool {
    TITLE_SHAPE.is_match(trimmed)
        && trimmed
            .split(' ')
            .all(|word| word.chars().count() <= 3 || word.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// `<text-without-colon>:` followed by content on the next line.
fn is_introductory(ctx: &LineContext) -> bool {
    INTRODUCTORY.is_match(ctx.trimmed) && !ctx.next.trim().is_empty()
}

/// Decides the heading level for a line, if any.
///
/// The ALL-CAPS and introductory-colon rules fire independently of the
/// generic candidate test; the Title Case rules require it.
pub(crate) fn classify_heading(ctx: &LineContext) -> Option<Heading> {
    let title = looks_like_title(ctx);
    let title_case = is_title_case(ctx.trimmed);

    if ALL_CAPS.is_match(ctx.trimmed) || (title && title_case && ctx.is_first) {
        Some(Heading::H1)
    } else if (title && title_case) || is_introductory(ctx) {
        Some(Heading::H2)
    } else if NUMBERED_SECTION.is_match(ctx.trimmed) {
        Some(Heading::H3)
    } else {
        None
    }
}

/// The ordered body transforms. Applied in sequence, each to the result of
/// the previous; the order is observable behavior (the flat bullet rule
/// consumes indented glyph bullets before the nesting rule sees them).
pub(crate) const BODY_RULES: &[(&str, fn(&str) -> String)] = &[
    ("numbered-list", normalize_numbered_list),
    ("bullet", normalize_bullets),
    ("nested-bullet", nest_indented_bullets),
    ("linkify", linkify_urls),
    ("emphasis", normalize_emphasis),
];

/// Applies the body transforms and the final block-quote rule.
pub(crate) fn transform_body_line(ctx: &LineContext) -> String {
    let mut line = ctx.line.to_string();
    for (_, rule) in BODY_RULES {
        line = rule(&line);
    }
    quote_if_quoted(line, ctx.trimmed)
}

/// Rewrites a leading `N.` or `N)` to `N. `, but only when the remainder is
/// long or ends in punctuation. Short unpunctuated items are left alone so
/// numbered headings stay untouched.
fn normalize_numbered_list(line: &str) -> String {
    if let Some(caps) = NUMBERED_ITEM.captures(line) {
        let content = &caps[3];
        if content.chars().count() > MAX_HEADING_TEXT_LENGTH || TRAILING_PUNCT.is_match(content) {
            return format!("{}{}. {}", &caps[1], &caps[2], content);
        }
    }
    line.to_string()
}

/// Rewrites bullet glyphs and leading `*` markers to `- `.
fn normalize_bullets(line: &str) -> String {
    if let Some(caps) = GLYPH_BULLET.captures(line) {
        return format!("- {}", &caps[1]);
    }
    if let Some(caps) = STAR_BULLET.captures(line) {
        return format!("- {}", &caps[1]);
    }
    line.to_string()
}

/// Re-indents a leading-whitespace glyph bullet at two spaces per two
/// characters of original indentation. Only reachable if the flat bullet
/// rule above stops consuming indented bullets first.
fn nest_indented_bullets(line: &str) -> String {
    if let Some(caps) = INDENTED_GLYPH_BULLET.captures(line) {
        let level = caps[1].chars().count() / 2;
        return format!("{}- {}", "  ".repeat(level), &caps[2]);
    }
    line.to_string()
}

/// Rewrites bare `http(s)://` URLs to `[domain](url)`.
///
/// A URL already wrapped in Markdown link syntax is skipped: preceded by `[`
/// or `(`, or immediately followed by `)`. Unparseable URLs pass through.
fn linkify_urls(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for m in BARE_URL.find_iter(line) {
        out.push_str(&line[last..m.start()]);
        let before = line[..m.start()].chars().next_back();
        let after = line[m.end()..].chars().next();
        let in_link = matches!(before, Some('[') | Some('(')) || after == Some(')');
        match (in_link, Url::parse(m.as_str())) {
            (false, Ok(url)) if url.host_str().is_some() => {
                let host = url.host_str().unwrap_or_default();
                let domain = host.replacen("www.", "", 1);
                out.push_str(&format!("[{}]({})", domain, m.as_str()));
            }
            _ => out.push_str(m.as_str()),
        }
        last = m.end();
    }
    out.push_str(&line[last..]);
    out
}

/// Normalizes emphasis delimiters: `__text__` becomes `**text**`, isolated
/// single `*text*` and `_text_` spans become `_text_`. Backtick spans are
/// untouched.
fn normalize_emphasis(line: &str) -> String {
    let line = BOLD_UNDERSCORE.replace_all(line, "**$1**");
    let line = replace_isolated_span(&line, &STAR_SPAN, '*');
    replace_isolated_span(&line, &UNDERSCORE_SPAN, '_')
}

/// Replaces single-delimiter spans with `_…_`, skipping matches adjacent to
/// another delimiter character (part of a double-delimiter run).
fn replace_isolated_span(line: &str, re: &Regex, delim: char) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for caps in re.captures_iter(line) {
        let m = caps.get(0).expect("capture 0 always present");
        out.push_str(&line[last..m.start()]);
        let before = line[..m.start()].chars().next_back();
        let after = line[m.end()..].chars().next();
        if before == Some(delim) || after == Some(delim) {
            out.push_str(m.as_str());
        } else {
            out.push('_');
            out.push_str(&caps[1]);
            out.push('_');
        }
        last = m.end();
    }
    out.push_str(&line[last..]);
    out
}

/// Prefixes lines that open with a quote character with `> `.
fn quote_if_quoted(line: String, trimmed: &str) -> String {
    if trimmed.starts_with('"') || trimmed.starts_with('\'') {
        format!("> {}", line.trim())
    } else {
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(line: &'a str, prev: &'a str, next: &'a str, is_first: bool) -> LineContext<'a> {
        LineContext {
            line,
            trimmed: line.trim(),
            prev,
            next,
            is_first,
        }
    }

    #[test]
    fn test_all_caps_is_h1() {
        // Fires even when followed by a blank line.
        let c = ctx("INTRODUCTION", "", "", true);
        assert_eq!(classify_heading(&c), Some(Heading::H1));
    }

    #[test]
    fn test_title_case_first_line_is_h1() {
        let c = ctx("Getting Started", "", "Some text", true);
        assert_eq!(classify_heading(&c), Some(Heading::H1));
    }

    #[test]
    fn test_title_case_later_is_h2() {
        let c = ctx("Getting Started", "", "Some text", false);
        assert_eq!(classify_heading(&c), Some(Heading::H2));
    }

    #[test]
    fn test_title_case_without_blank_above_not_heading() {
        let c = ctx("Getting Started", "previous text", "Some text", false);
        assert_eq!(classify_heading(&c), None);
    }

    #[test]
    fn test_introductory_colon_is_h2() {
        let c = ctx("Ingredients:", "body", "flour", false);
        assert_eq!(classify_heading(&c), Some(Heading::H2));
    }

    #[test]
    fn test_introductory_colon_without_content_not_heading() {
        let c = ctx("Ingredients:", "body", "", false);
        assert_eq!(classify_heading(&c), None);
    }

    #[test]
    fn test_numbered_section_is_h3() {
        let c = ctx("1. Overview", "", "", false);
        assert_eq!(classify_heading(&c), Some(Heading::H3));
    }

    #[test]
    fn test_trailing_punctuation_blocks_title() {
        let c = ctx("Getting Started.", "", "Some text", true);
        assert_eq!(classify_heading(&c), None);
    }

    #[test]
    fn test_long_line_not_heading() {
        let long = "Word ".repeat(20) + "End";
        let c = ctx(&long, "", "Some text", true);
        assert_eq!(classify_heading(&c), None);
    }

    #[test]
    fn test_short_word_exemption_in_title_case() {
        // "of" is lowercase but ≤3 chars, so still Title Case.
        let c = ctx("Table of Contents", "", "entries", false);
        assert_eq!(classify_heading(&c), Some(Heading::H2));
    }

    #[test]
    fn test_existing_heading_not_reclassified() {
        let c = ctx("# Title", "", "body", true);
        assert_eq!(classify_heading(&c), None);
        assert_eq!(render_line(&c), "# Title");
    }

    #[test]
    fn test_numbered_list_long_content_normalized() {
        let long = format!("1) {}", "x".repeat(90));
        assert_eq!(
            normalize_numbered_list(&long),
            format!("1. {}", "x".repeat(90))
        );
    }

    #[test]
    fn test_numbered_list_punctuated_content_normalized() {
        assert_eq!(
            normalize_numbered_list("2) Mix the flour and water."),
            "2. Mix the flour and water."
        );
    }

    #[test]
    fn test_numbered_short_unpunctuated_untouched() {
        assert_eq!(normalize_numbered_list("1) Overview"), "1) Overview");
    }

    #[test]
    fn test_bullet_glyphs_normalized() {
        assert_eq!(normalize_bullets("• First"), "- First");
        assert_eq!(normalize_bullets("· item"), "- item");
        assert_eq!(normalize_bullets("* starred"), "- starred");
    }

    #[test]
    fn test_indented_bullet_loses_indent_to_flat_rule() {
        // Rule order: the flat bullet rule runs first and strips indentation.
        assert_eq!(normalize_bullets("    • nested"), "- nested");
    }

    #[test]
    fn test_linkify_bare_url() {
        assert_eq!(
            linkify_urls("Visit https://www.example.com/page for info"),
            "Visit [example.com](https://www.example.com/page) for info"
        );
    }

    #[test]
    fn test_linkify_skips_existing_markdown_link() {
        let line = "[site](https://example.com/x)";
        assert_eq!(linkify_urls(line), line);
    }

    #[test]
    fn test_linkify_strips_leading_www_only_once() {
        assert_eq!(
            linkify_urls("https://www.www.example.com/"),
            "[www.example.com](https://www.www.example.com/)"
        );
    }

    #[test]
    fn test_emphasis_double_underscore_to_bold() {
        assert_eq!(normalize_emphasis("say __hello__ there"), "say **hello** there");
    }

    #[test]
    fn test_emphasis_single_star_to_underscore() {
        assert_eq!(normalize_emphasis("an *italic* word"), "an _italic_ word");
    }

    #[test]
    fn test_emphasis_bold_stars_untouched() {
        assert_eq!(normalize_emphasis("a **bold** word"), "a **bold** word");
    }

    #[test]
    fn test_backtick_spans_untouched() {
        assert_eq!(normalize_emphasis("run `cargo test` now"), "run `cargo test` now");
    }

    #[test]
    fn test_quote_prefix() {
        let c = ctx("\"To be or not to be\"", "", "", false);
        assert_eq!(render_line(&c), "> \"To be or not to be\"");
    }

    #[test]
    fn test_body_rule_order_is_stable() {
        let names: Vec<&str> = BODY_RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["numbered-list", "bullet", "nested-bullet", "linkify", "emphasis"]
        );
    }
}

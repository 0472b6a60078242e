//! Context validation
//!
//! Decides whether a cursor position is in code that should react to quote
//! rewriting at all. Line comments, unclosed block comments, import lines
//! and regex literals are all rejected; for svelte, edits outside the
//! `<script>` block are rejected as well.
//!
//! All checks are line-local except the script-block scan, which walks the
//! whole document through a [`LineSource`].

use regex::Regex;
use std::sync::LazyLock;

use crate::buffer::LineSource;
use crate::position::Position;
use crate::quote::QuoteRegion;
use crate::util::{char_col, char_slice};

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:import|require|from)\s").expect("import pattern"));

static REGEX_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[^/\n]*/[gimuy]*").expect("regex literal pattern"));

static SCRIPT_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script(?:\s[^>]*)?>").expect("script open pattern"));

static SCRIPT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</script>").expect("script close pattern"));

/// Whether the position is eligible for conversion, with no quote region to
/// take into account. Used by the whole-document scanner.
pub fn is_eligible(line_text: &str, cursor_col: usize) -> bool {
    let before = char_slice(line_text, 0, cursor_col);
    if before.contains("//") {
        return false;
    }
    is_eligible_outside_comment(line_text, &before)
}

/// Eligibility for an interactive edit inside a located quote region.
///
/// Differs from [`is_eligible`] in the line-comment check: a `//` that sits
/// inside the quote region (a URL in a string, typically) does not make the
/// line a comment.
pub fn is_eligible_at(line_text: &str, cursor_col: usize, region: &QuoteRegion) -> bool {
    if !not_in_comment(line_text, cursor_col, region.start_col, region.end_col) {
        return false;
    }
    let before = char_slice(line_text, 0, cursor_col);
    is_eligible_outside_comment(line_text, &before)
}

fn is_eligible_outside_comment(line_text: &str, before: &str) -> bool {
    if IMPORT_RE.is_match(line_text) {
        return false;
    }
    if let Some(open) = before.rfind("/*") {
        if !before[open..].contains("*/") {
            return false;
        }
    }
    let cursor_col = before.chars().count();
    for m in REGEX_LITERAL_RE.find_iter(line_text) {
        let start = char_col(line_text, m.start());
        let end = char_col(line_text, m.end());
        if cursor_col > start && cursor_col < end {
            return false;
        }
    }
    true
}

/// True unless a `//` before `char_index` starts a real line comment.
///
/// A marker between `start_quote` and `end_quote` is string content, not a
/// comment, and does not disqualify the position.
pub fn not_in_comment(
    line_text: &str,
    char_index: usize,
    start_quote: usize,
    end_quote: usize,
) -> bool {
    let before = char_slice(line_text, 0, char_index);
    match before.find("//") {
        None => true,
        Some(byte_idx) => {
            let idx = char_col(&before, byte_idx);
            start_quote < idx && idx < end_quote
        }
    }
}

/// A `<script>`...`</script>` span in a svelte document.
///
/// `start` points at the `<` of the opening tag, `end` just past the
/// closing tag. Positions on the boundary columns count as outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock {
    pub start: Position,
    pub end: Position,
}

impl ScriptBlock {
    pub fn contains(&self, pos: Position) -> bool {
        if pos.line < self.start.line || pos.line > self.end.line {
            return false;
        }
        if pos.line == self.start.line && pos.column <= self.start.column {
            return false;
        }
        if pos.line == self.end.line && pos.column >= self.end.column {
            return false;
        }
        true
    }
}

/// Scan the document for `<script>` blocks, pairing each opener with the
/// next closing tag. Self-closing tags (`<script ... />`) open nothing.
pub fn find_script_blocks(source: &dyn LineSource) -> Vec<ScriptBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<Position> = None;

    for line in 0..source.line_count() {
        let Some(text) = source.line_text(line) else {
            continue;
        };
        let text = text.as_ref();

        if open.is_none() {
            if let Some(m) = SCRIPT_OPEN_RE.find(text) {
                if !text.contains("/>") {
                    open = Some(Position::new(line, char_col(text, m.start())));
                    // The closer may sit on the same line; fall through.
                }
            }
        }
        if let Some(start) = open {
            if let Some(m) = SCRIPT_CLOSE_RE.find(text) {
                let close_col = char_col(text, m.start());
                if line > start.line || close_col > start.column {
                    blocks.push(ScriptBlock {
                        start,
                        end: Position::new(line, close_col + "</script>".chars().count()),
                    });
                    open = None;
                }
            }
        }
    }
    blocks
}

/// Whether the position sits inside any `<script>` block of the document.
pub fn is_within_script_block(source: &dyn LineSource, position: Position) -> bool {
    find_script_blocks(source)
        .iter()
        .any(|block| block.contains(position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;
    use crate::quote::{locate, DelimiterPreference};

    #[test]
    fn test_rejects_line_comment() {
        let line = "// const s = \"text\"";
        assert!(!is_eligible(line, 15));
    }

    #[test]
    fn test_rejects_import_line() {
        assert!(!is_eligible("import foo from \"bar\"", 18));
        assert!(!is_eligible("  import { x } from \"y\"", 22));
        assert!(is_eligible("const importCount = \"3\"", 22));
    }

    #[test]
    fn test_rejects_unclosed_block_comment() {
        let line = "/* note \"text\"";
        assert!(!is_eligible(line, 10));
        let closed = "/* note */ \"text\"";
        assert!(is_eligible(closed, 13));
    }

    #[test]
    fn test_rejects_cursor_inside_regex_literal() {
        let line = "const re = /ab\"cd/g;";
        assert!(!is_eligible(line, 15));
        assert!(is_eligible("const s = \"plain\";", 13));
    }

    #[test]
    fn test_url_in_string_is_not_a_comment() {
        let line = "const u = \"https://example.com/${path}\";";
        let region = locate(line, 0, 20, DelimiterPreference::AnyQuote, true).unwrap();
        assert!(is_eligible_at(line, 20, &region));
        // Without the region the double slash reads as a comment.
        assert!(!is_eligible(line, 20));
    }

    #[test]
    fn test_comment_before_string_still_rejected() {
        let line = "x; // set \"value\"";
        let region = QuoteRegion {
            line: 0,
            start_col: 10,
            end_col: 16,
            delimiter: '"',
            end_delimiter: '"',
            content: "value".into(),
        };
        assert!(!is_eligible_at(line, 13, &region));
    }

    #[test]
    fn test_script_block_detection() {
        let text = "<script lang=\"ts\">\n  let name = \"world\";\n</script>\n<p>{name}</p>\n";
        let buf = RopeBuffer::from_text(text);
        let blocks = find_script_blocks(&buf);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start, Position::new(0, 0));
        assert_eq!(blocks[0].end, Position::new(2, 9));

        assert!(is_within_script_block(&buf, Position::new(1, 14)));
        assert!(!is_within_script_block(&buf, Position::new(3, 4)));
    }

    #[test]
    fn test_self_closing_script_opens_nothing() {
        let text = "<script src=\"x.js\" />\n<p>\"hi\"</p>\n";
        let buf = RopeBuffer::from_text(text);
        assert!(find_script_blocks(&buf).is_empty());
    }

    #[test]
    fn test_script_block_boundary_columns_are_outside() {
        let text = "<script>let a = 1</script>\n";
        let buf = RopeBuffer::from_text(text);
        let blocks = find_script_blocks(&buf);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert!(!block.contains(Position::new(0, 0)));
        assert!(block.contains(Position::new(0, 12)));
        assert!(!block.contains(Position::new(0, 26)));
    }
}

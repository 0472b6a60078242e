//! Quote region finder
//!
//! Locates the quote-delimited region around an offset on a single line,
//! using escape-aware left/right scans. Scanning never crosses a line break:
//! when either side has no candidate delimiter before the line boundary the
//! lookup fails.

use std::ops::Range;

use crate::position::Position;

/// Which delimiter kinds the finder may anchor on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterPreference {
    /// Single or double quotes; backticks only when neither is present
    AnyQuote,
    SingleOnly,
    DoubleOnly,
    BacktickOnly,
}

impl DelimiterPreference {
    fn quote_char(self) -> Option<char> {
        match self {
            DelimiterPreference::AnyQuote => None,
            DelimiterPreference::SingleOnly => Some('\''),
            DelimiterPreference::DoubleOnly => Some('"'),
            DelimiterPreference::BacktickOnly => Some('`'),
        }
    }
}

/// A delimiter-bounded span on one line.
///
/// `content` is exactly the text strictly between the delimiter columns.
/// `delimiter` is the character at `start_col`; the character found at
/// `end_col` is kept separately so callers can reject mismatched pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRegion {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub delimiter: char,
    pub end_delimiter: char,
    pub content: String,
}

impl QuoteRegion {
    /// Both delimiter characters are the same kind.
    pub fn is_matched(&self) -> bool {
        self.delimiter == self.end_delimiter
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.start_col)
    }

    pub fn end(&self) -> Position {
        Position::new(self.line, self.end_col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

/// Locate the quote region enclosing `offset` on `line_text`.
///
/// The left scan covers columns `[0, offset)`, the right scan
/// `[offset + 1, end-of-line)`; the column at `offset` itself (usually the
/// character just typed) is never treated as a delimiter. An offset before
/// the first column always fails: there is nothing to anchor a start
/// delimiter on.
pub fn locate(
    line_text: &str,
    line: usize,
    offset: usize,
    preference: DelimiterPreference,
    prefer_outermost: bool,
) -> Option<QuoteRegion> {
    let chars: Vec<char> = line_text.chars().collect();
    if offset < 1 || offset >= chars.len() {
        return None;
    }

    let start_col = delimiter_index(&chars, 0..offset, preference, Side::Start, prefer_outermost)?;
    let end_col = delimiter_index(
        &chars,
        offset + 1..chars.len(),
        preference,
        Side::End,
        prefer_outermost,
    )?;
    if end_col <= start_col {
        return None;
    }

    Some(QuoteRegion {
        line,
        start_col,
        end_col,
        delimiter: chars[start_col],
        end_delimiter: chars[end_col],
        content: chars[start_col + 1..end_col].iter().collect(),
    })
}

/// Pick the delimiter column within `range` for one side of the scan.
///
/// `prefer_outermost` decides the tie-break when several candidates exist:
/// the outermost policy takes the first index on the start side and the last
/// on the end side; innermost is the reverse. Under `AnyQuote`, backticks
/// only win when no plain quote is present; under a specific kind, an
/// existing backtick still takes priority so already-converted strings are
/// re-anchored on their backticks.
fn delimiter_index(
    chars: &[char],
    range: Range<usize>,
    preference: DelimiterPreference,
    side: Side,
    prefer_outermost: bool,
) -> Option<usize> {
    let find_first = (side == Side::Start && prefer_outermost)
        || (side == Side::End && !prefer_outermost);
    let pick = |target: char| unescaped_index(chars, &range, target, find_first);

    match preference.quote_char() {
        None => {
            let double = pick('"');
            let single = pick('\'');
            match (double, single) {
                (Some(d), Some(s)) => Some(if find_first { d.min(s) } else { d.max(s) }),
                (Some(d), None) => Some(d),
                (None, Some(s)) => Some(s),
                (None, None) => pick('`'),
            }
        }
        Some(quote) => pick('`').or_else(|| pick(quote)),
    }
}

/// First or last unescaped occurrence of `target` within `range`.
///
/// Escape pairs are tracked from the start of the line so a backslash just
/// before the range still escapes the range's first character. A backslash
/// escapes the character after it and the pair is skipped together, which
/// means `\\` does not escape whatever follows it.
fn unescaped_index(chars: &[char], range: &Range<usize>, target: char, first: bool) -> Option<usize> {
    let mut found = None;
    let mut i = 0;
    while i < chars.len() && i < range.end {
        if chars[i] == '\\' {
            i += 2;
            continue;
        }
        if chars[i] == target && i >= range.start {
            if first {
                return Some(i);
            }
            found = Some(i);
        }
        i += 1;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate_any(line: &str, offset: usize) -> Option<QuoteRegion> {
        locate(line, 0, offset, DelimiterPreference::AnyQuote, true)
    }

    #[test]
    fn test_finds_double_quoted_region() {
        let line = r#"const message = "Hello ${name}";"#;
        let region = locate_any(line, 24).unwrap();
        assert_eq!(region.start_col, 16);
        assert_eq!(region.end_col, 30);
        assert_eq!(region.delimiter, '"');
        assert_eq!(region.content, "Hello ${name}");
        assert!(region.is_matched());
    }

    #[test]
    fn test_finds_single_quoted_region() {
        let line = "const a = 'hi there';";
        let region = locate_any(line, 13).unwrap();
        assert_eq!(region.delimiter, '\'');
        assert_eq!(region.content, "hi there");
    }

    #[test]
    fn test_backtick_only_when_no_quotes() {
        let line = "const t = `tpl ${x}`;";
        let region = locate_any(line, 14).unwrap();
        assert_eq!(region.delimiter, '`');
        assert_eq!(region.content, "tpl ${x}");
    }

    #[test]
    fn test_offset_zero_fails() {
        assert!(locate_any("\"abc\"", 0).is_none());
    }

    #[test]
    fn test_no_closing_delimiter_fails() {
        let line = r#"const s = "unterminated"#;
        assert!(locate_any(line, 13).is_none());
    }

    #[test]
    fn test_escaped_quote_is_not_a_boundary() {
        // The escaped quote inside the content must not terminate the region.
        let line = r#"x = "a \" b";"#;
        let region = locate_any(line, 6).unwrap();
        assert_eq!(region.start_col, 4);
        assert_eq!(region.end_col, 11);
        assert_eq!(region.content, r#"a \" b"#);
    }

    #[test]
    fn test_double_backslash_does_not_escape_quote() {
        let line = r#"x = "a \\" + y;"#;
        let region = locate_any(line, 6).unwrap();
        assert_eq!(region.end_col, 9);
    }

    #[test]
    fn test_outermost_vs_innermost() {
        // Apostrophe inside a double-quoted string.
        let line = r#"say("it's ${w}", 'x')"#;
        let outer = locate(line, 0, 11, DelimiterPreference::AnyQuote, true).unwrap();
        assert_eq!(outer.start_col, 4);
        assert_eq!(outer.delimiter, '"');

        let inner = locate(line, 0, 11, DelimiterPreference::AnyQuote, false).unwrap();
        assert_eq!(inner.start_col, 7);
        assert_eq!(inner.delimiter, '\'');
    }

    #[test]
    fn test_specific_kind_prefers_existing_backtick() {
        let line = "const t = `a ${x} b`;";
        let region = locate(line, 0, 14, DelimiterPreference::DoubleOnly, true).unwrap();
        assert_eq!(region.delimiter, '`');
    }

    #[test]
    fn test_mismatched_delimiters_detectable() {
        let line = "f('a, \"b)"; // apostrophe left, double quote right
        let region = locate(line, 0, 4, DelimiterPreference::AnyQuote, false).unwrap();
        assert!(!region.is_matched());
    }

    #[test]
    fn test_offset_past_end_of_line_fails() {
        assert!(locate_any("\"ab\"", 9).is_none());
    }
}

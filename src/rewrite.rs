//! Rewrite planning
//!
//! Turns a located region into the minimal set of single-character edits
//! plus the cursor position to restore afterwards. Planners never touch a
//! buffer; the dispatcher applies their output atomically.

use regex::Regex;

use crate::buffer::Replacement;
use crate::markup::AttributeRegion;
use crate::position::Position;
use crate::quote::QuoteRegion;
use crate::util::char_col;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("delimiter boundaries not found")]
    BoundariesNotFound,
}

/// Planned edits and the cursor position after they land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub replacements: Vec<Replacement>,
    pub cursor: Option<Position>,
}

impl RewriteResult {
    fn swap_pair(region: &QuoteRegion, start_text: &str, end_text: &str) -> Self {
        Self {
            replacements: vec![
                Replacement::char_at(region.line, region.start_col, start_text),
                Replacement::char_at(region.line, region.end_col, end_text),
            ],
            cursor: None,
        }
    }
}

/// Swap both region delimiters for backticks. Content is untouched.
pub fn to_backticks(region: &QuoteRegion) -> RewriteResult {
    RewriteResult::swap_pair(region, "`", "`")
}

/// Swap both region delimiters for `quote_char`. Used by reversion.
pub fn to_quotes(region: &QuoteRegion, quote_char: char) -> RewriteResult {
    let quote = quote_char.to_string();
    RewriteResult::swap_pair(region, &quote, &quote)
}

/// Swap the region delimiters for an opening and closing brace.
pub fn to_braces(region: &QuoteRegion) -> RewriteResult {
    RewriteResult::swap_pair(region, "{", "}")
}

/// Wrap a backtick attribute value in braces: `` name=`v` `` becomes
/// `` name={`v`} ``. The backticks themselves stay.
pub fn wrap_backtick_attribute(attr: &AttributeRegion) -> Result<RewriteResult, RewriteError> {
    if !attr.backtick_delimited {
        return Err(RewriteError::BoundariesNotFound);
    }
    Ok(RewriteResult {
        replacements: vec![
            Replacement::char_at(attr.start.line, attr.start.column, "{`"),
            Replacement::char_at(attr.end.line, attr.end.column, "`}"),
        ],
        cursor: None,
    })
}

/// Swap the quote delimiters of an attribute value for braces:
/// `name="v"` becomes `name={v}`.
///
/// The value is re-located by name on the line so the delimiters are read
/// from the current text rather than the parsed region; mismatched quote
/// pairs are rejected.
pub fn wrap_attribute_in_braces(
    attr: &AttributeRegion,
    line_text: &str,
) -> Result<RewriteResult, RewriteError> {
    let pattern = format!(
        "{}{}{}",
        r"\b",
        regex::escape(&attr.name),
        r#"\s*=\s*(["'`])[^"'`]*(["'`])"#
    );
    let re = Regex::new(&pattern).map_err(|_| RewriteError::BoundariesNotFound)?;

    for caps in re.captures_iter(line_text) {
        let open = caps.get(1).ok_or(RewriteError::BoundariesNotFound)?;
        let close = caps.get(2).ok_or(RewriteError::BoundariesNotFound)?;
        if open.as_str() != close.as_str() {
            continue;
        }
        let open_col = char_col(line_text, open.start());
        let close_col = char_col(line_text, close.start());
        if open_col != attr.start.column {
            continue;
        }
        return Ok(RewriteResult {
            replacements: vec![
                Replacement::char_at(attr.start.line, open_col, "{"),
                Replacement::char_at(attr.start.line, close_col, "}"),
            ],
            cursor: None,
        });
    }
    Err(RewriteError::BoundariesNotFound)
}

/// Swap the braces of an attribute value back to quotes:
/// `name={v}` becomes `name="v"`.
pub fn unwrap_attribute_braces(
    attr: &AttributeRegion,
    line_text: &str,
    quote_char: char,
) -> Result<RewriteResult, RewriteError> {
    let pattern = format!("{}{}{}", r"\b", regex::escape(&attr.name), r"\s*=\s*\{[^}]*\}");
    let re = Regex::new(&pattern).map_err(|_| RewriteError::BoundariesNotFound)?;
    let quote = quote_char.to_string();

    for m in re.find_iter(line_text) {
        let open_byte = m.as_str().find('{').ok_or(RewriteError::BoundariesNotFound)?;
        let open_col = char_col(line_text, m.start() + open_byte);
        let close_col = char_col(line_text, m.end()).saturating_sub(1);
        if open_col != attr.start.column {
            continue;
        }
        return Ok(RewriteResult {
            replacements: vec![
                Replacement::char_at(attr.start.line, open_col, &quote),
                Replacement::char_at(attr.start.line, close_col, &quote),
            ],
            cursor: None,
        });
    }
    Err(RewriteError::BoundariesNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{RopeBuffer, TextBuffer, TextBufferMut};
    use crate::markup::find_attribute_at;
    use crate::quote::{locate, DelimiterPreference};

    fn region(line: &str, offset: usize) -> QuoteRegion {
        locate(line, 0, offset, DelimiterPreference::AnyQuote, true).unwrap()
    }

    #[test]
    fn test_to_backticks_swaps_only_delimiters() {
        let line = r#"const m = "Hello ${name}";"#;
        let mut buf = RopeBuffer::from_text(line);
        let plan = to_backticks(&region(line, 20));
        buf.apply_edits(&plan.replacements).unwrap();
        assert_eq!(buf.content(), "const m = `Hello ${name}`;");
    }

    #[test]
    fn test_to_quotes_restores_preferred_quote() {
        let line = "const m = `Hello name`;";
        let mut buf = RopeBuffer::from_text(line);
        let plan = to_quotes(&region(line, 14), '\'');
        buf.apply_edits(&plan.replacements).unwrap();
        assert_eq!(buf.content(), "const m = 'Hello name';");
    }

    #[test]
    fn test_to_braces_swaps_quotes_for_braces() {
        let line = r#"<div className="styles.${kind}">"#;
        let mut buf = RopeBuffer::from_text(line);
        let plan = to_braces(&region(line, 25));
        buf.apply_edits(&plan.replacements).unwrap();
        assert_eq!(buf.content(), "<div className={styles.${kind}}>");
    }

    #[test]
    fn test_wrap_backtick_attribute() {
        let line = "<div className=`btn ${kind}`>";
        let mut buf = RopeBuffer::from_text(line);
        let attr = find_attribute_at(line, 0, 22).unwrap();
        let plan = wrap_backtick_attribute(&attr).unwrap();
        buf.apply_edits(&plan.replacements).unwrap();
        assert_eq!(buf.content(), "<div className={`btn ${kind}`}>");
    }

    #[test]
    fn test_wrap_attribute_in_braces() {
        let line = r#"<img alt="hi" src="a.png">"#;
        let mut buf = RopeBuffer::from_text(line);
        let attr = find_attribute_at(line, 0, 20).unwrap();
        assert_eq!(attr.name, "src");
        let plan = wrap_attribute_in_braces(&attr, line).unwrap();
        buf.apply_edits(&plan.replacements).unwrap();
        assert_eq!(buf.content(), r#"<img alt="hi" src={a.png}>"#);
    }

    #[test]
    fn test_wrap_rejects_mismatched_quotes() {
        let line = r#"<img src="a.png'>"#;
        let attr = AttributeRegion {
            name: "src".into(),
            value: "a.png".into(),
            start: Position::new(0, 9),
            end: Position::new(0, 15),
            has_interpolation: false,
            brace_delimited: false,
            backtick_delimited: false,
        };
        assert_eq!(
            wrap_attribute_in_braces(&attr, line),
            Err(RewriteError::BoundariesNotFound)
        );
    }

    #[test]
    fn test_unwrap_attribute_braces() {
        let line = "<div id={main}>";
        let mut buf = RopeBuffer::from_text(line);
        let attr = find_attribute_at(line, 0, 10).unwrap();
        let plan = unwrap_attribute_braces(&attr, line, '"').unwrap();
        buf.apply_edits(&plan.replacements).unwrap();
        assert_eq!(buf.content(), "<div id=\"main\">");
    }
}

//! Markup attribute handling
//!
//! Regex-driven recognition of tags and attribute values on a line of
//! JSX-style markup, plus the heuristics that decide whether the cursor is
//! in a markup context at all. Parsing is deliberately shallow: one line at
//! a time, no real tree, matching what an on-type rewrite can afford.

use regex::Regex;
use std::sync::LazyLock;

use crate::buffer::LineSource;
use crate::interpolation::has_interpolation;
use crate::position::Position;
use crate::util::{char_col, char_slice};

// =============================================================================
// Patterns
// =============================================================================

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(@?[A-Za-z][A-Za-z0-9]*)([^>]*?)(/?)>").expect("tag pattern"));

static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w-]+)\s*=\s*([^>\s]+)").expect("attr pattern"));

static BACKTICK_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w-]+)\s*=\s*`([^`]*)`").expect("backtick attr pattern"));

static ATTR_ASSIGN_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w-]+)\s*=\s*$").expect("attr tail pattern"));

static OPEN_TAG_TAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][A-Za-z0-9]*[^>]*$").expect("open tag tail pattern"));

static OPEN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][A-Za-z0-9]*").expect("open tag pattern"));

static CLOSE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</[A-Za-z][A-Za-z0-9]*>").expect("close tag pattern"));

/// One plausible tag, with optional attributes, anywhere in a text window.
/// Used as a cheap "does this even look like markup" probe.
static MARKUP_WINDOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)</?(?:[\w.:-]+\s*(?:\s+(?:[\w.:$-]+(?:=(?:"(?:\\[\s\S]|[^\\"])*"|'(?:\\[\s\S]|[^\\'])*'|[^\s{'">=]+|\{(?:\{(?:\{[^{}]*\}|[^{}])*\}|[^{}])+\}))?|\{\s*\.{3}\s*[a-z_$][\w$]*(?:\.[a-z_$][\w$]*)*\s*\}))*\s*/?)?>"#,
    )
    .expect("markup window pattern")
});

/// Attribute names eligible for backtick-to-brace wrapping.
const RECOGNIZED_ATTRIBUTES: &[&str] = &[
    "className",
    "class",
    "id",
    "src",
    "alt",
    "href",
    "title",
    "aria-label",
    "data-testid",
];

pub fn is_recognized_attribute(name: &str) -> bool {
    RECOGNIZED_ATTRIBUTES.contains(&name)
}

/// Language ids whose markup attributes participate in brace wrapping.
pub fn is_markup_language(language_id: &str) -> bool {
    matches!(
        language_id,
        "javascriptreact" | "typescriptreact" | "jsx" | "tsx"
    )
}

// =============================================================================
// Attribute regions
// =============================================================================

/// An attribute value span on one line.
///
/// `start` and `end` are the columns of the two delimiter characters when
/// the value is delimited; for a bare token they are its first and last
/// character. `value` is the text with delimiters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRegion {
    pub name: String,
    pub value: String,
    pub start: Position,
    pub end: Position,
    pub has_interpolation: bool,
    pub brace_delimited: bool,
    pub backtick_delimited: bool,
}

impl AttributeRegion {
    pub fn quote_delimited(&self) -> bool {
        !self.brace_delimited && !self.backtick_delimited
    }

    fn contains_column(&self, col: usize) -> bool {
        col >= self.start.column && col <= self.end.column
    }
}

/// A tag and its parsed attributes on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub tag: String,
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub self_closing: bool,
    pub attributes: Vec<AttributeRegion>,
}

/// Parse every complete tag on the line into elements with attributes.
pub fn find_elements_in_line(line_text: &str, line: usize) -> Vec<MarkupElement> {
    TAG_RE
        .captures_iter(line_text)
        .map(|caps| {
            let whole = caps.get(0).expect("whole match");
            let attrs = caps.get(2).expect("attrs group");
            MarkupElement {
                tag: caps[1].to_string(),
                line,
                start_col: char_col(line_text, whole.start()),
                end_col: char_col(line_text, whole.end()).saturating_sub(1),
                self_closing: &caps[3] == "/",
                attributes: parse_attributes(line_text, line, attrs.as_str(), attrs.start()),
            }
        })
        .collect()
}

/// Parse the attribute text of a tag. Backtick-delimited values are matched
/// first (their content may contain spaces) and masked from the generic
/// pass.
fn parse_attributes(
    line_text: &str,
    line: usize,
    attrs_text: &str,
    attrs_byte_start: usize,
) -> Vec<AttributeRegion> {
    let mut regions = Vec::new();
    let mut backtick_names: Vec<String> = Vec::new();

    for caps in BACKTICK_ATTR_RE.captures_iter(attrs_text) {
        let value = caps.get(2).expect("backtick value");
        let open = attrs_byte_start + value.start() - 1;
        let close = attrs_byte_start + value.end();
        regions.push(AttributeRegion {
            name: caps[1].to_string(),
            value: value.as_str().to_string(),
            start: Position::new(line, char_col(line_text, open)),
            end: Position::new(line, char_col(line_text, close)),
            has_interpolation: has_interpolation(value.as_str()),
            brace_delimited: false,
            backtick_delimited: true,
        });
        backtick_names.push(caps[1].to_string());
    }

    for caps in ATTR_RE.captures_iter(attrs_text) {
        let name = &caps[1];
        if backtick_names.iter().any(|n| n == name) {
            continue;
        }
        let token = caps.get(2).expect("attr value token");
        let raw = token.as_str();
        let first = raw.chars().next();
        let last = raw.chars().last();
        let brace_delimited = first == Some('{') && last == Some('}');
        let backtick_delimited = first == Some('`') && last == Some('`') && raw.len() > 1;
        let value = clean_value(raw);
        regions.push(AttributeRegion {
            name: name.to_string(),
            value: value.clone(),
            start: Position::new(line, char_col(line_text, attrs_byte_start + token.start())),
            end: Position::new(
                line,
                char_col(line_text, attrs_byte_start + token.end()).saturating_sub(1),
            ),
            has_interpolation: has_interpolation(&value),
            brace_delimited,
            backtick_delimited,
        });
    }

    regions.sort_by_key(|r| r.start.column);
    regions
}

/// Strip one layer of quote, backtick or brace delimiters.
fn clean_value(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    if chars.len() >= 2 {
        let (first, last) = (chars[0], chars[chars.len() - 1]);
        let delimited = matches!((first, last), ('"', '"') | ('\'', '\'') | ('`', '`') | ('{', '}'));
        if delimited {
            return chars[1..chars.len() - 1].iter().collect();
        }
    }
    raw.to_string()
}

/// The attribute whose value span contains `col`, if any.
///
/// Complete tags are tried first; when the tag is still being typed (no `>`
/// yet) the backtick fallback looks for an enclosing backtick pair.
pub fn find_attribute_at(line_text: &str, line: usize, col: usize) -> Option<AttributeRegion> {
    for element in find_elements_in_line(line_text, line) {
        for attr in element.attributes {
            if attr.contains_column(col) {
                return Some(attr);
            }
        }
    }
    detect_backtick_attribute_at(line_text, line, col)
}

/// Backtick-pair fallback for an attribute inside an unclosed tag.
///
/// Requires `name=` immediately before the opening backtick and an open tag
/// head somewhere before that, so stray backticks in plain code never
/// qualify.
fn detect_backtick_attribute_at(line_text: &str, line: usize, col: usize) -> Option<AttributeRegion> {
    let chars: Vec<char> = line_text.chars().collect();
    let col = col.min(chars.len());

    let open = chars[..col].iter().rposition(|&c| c == '`')?;
    let close = col + chars[col..].iter().position(|&c| c == '`')?;

    let head: String = chars[..open].iter().collect();
    let name = ATTR_ASSIGN_TAIL_RE.captures(&head)?[1].to_string();
    if !OPEN_TAG_TAIL_RE.is_match(&head) {
        return None;
    }

    let value: String = chars[open + 1..close].iter().collect();
    Some(AttributeRegion {
        has_interpolation: has_interpolation(&value),
        name,
        value,
        start: Position::new(line, open),
        end: Position::new(line, close),
        brace_delimited: false,
        backtick_delimited: true,
    })
}

/// The backtick attribute to wrap when a brace trigger fires at `col`.
///
/// The value must be backtick-delimited, carry a live interpolation, and
/// belong to a recognized attribute name.
pub fn backtick_attribute_range(line_text: &str, line: usize, col: usize) -> Option<AttributeRegion> {
    let attr = find_attribute_at(line_text, line, col)?;
    if !attr.backtick_delimited || attr.brace_delimited {
        return None;
    }
    if !is_recognized_attribute(&attr.name) {
        return None;
    }
    if !attr.has_interpolation {
        return None;
    }
    Some(attr)
}

/// Characters whose insertion can complete an interpolation inside a
/// backtick attribute value.
pub fn should_trigger_brace_wrap(inserted: &str) -> bool {
    matches!(inserted, "{" | "}" | "{}" | "`")
}

// =============================================================================
// Markup context heuristics
// =============================================================================

/// Tag-balance probe: more opened than closed tags above the position.
pub fn is_within_markup_context(source: &dyn LineSource, position: Position) -> bool {
    let last = position.line.min(source.line_count().saturating_sub(1));
    let mut opens = 0usize;
    let mut closes = 0usize;

    for line in 0..=last {
        let Some(text) = source.line_text(line) else {
            continue;
        };
        let scanned = if line == position.line {
            char_slice(text.as_ref(), 0, position.column)
        } else {
            text.into_owned()
        };
        opens += OPEN_TAG_RE.find_iter(&scanned).count();
        closes += CLOSE_TAG_RE.find_iter(&scanned).count() + scanned.matches("/>").count();
    }
    opens > closes
}

/// Window probe around the cursor line: does the surrounding text contain
/// anything shaped like a tag?
///
/// A `;` or `,` anywhere on the cursor line, or a `:` before the cursor,
/// reads as plain code and discards the window outright.
pub fn window_is_markup(source: &dyn LineSource, position: Position) -> bool {
    let Some(line_text) = source.line_text(position.line) else {
        return false;
    };
    if line_text.contains(';') || line_text.contains(',') {
        return false;
    }
    if char_slice(line_text.as_ref(), 0, position.column).contains(':') {
        return false;
    }

    let first = position.line.saturating_sub(20);
    let last = (position.line + 21).min(source.line_count());
    let mut window = String::new();
    for line in first..last {
        if let Some(text) = source.line_text(line) {
            window.extend(text.chars().take(200));
            window.push('\n');
        }
    }
    MARKUP_WINDOW_RE.is_match(&window)
}

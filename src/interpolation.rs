//! Interpolation classifier
//!
//! Pure predicates over region content plus the template-string classifier
//! used by the dispatcher to answer "is the cursor inside backticks" and
//! "is it inside a live `${...}` span". The `${...}` pattern is deliberately
//! single-level: the body runs to the first `}` and nested braces are not
//! balanced.

use regex::Regex;
use std::sync::LazyLock;

use crate::buffer::LineSource;
use crate::position::Position;

static INTERPOLATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("interpolation pattern"));

/// Content contains at least one complete `${...}` span.
pub fn has_interpolation(content: &str) -> bool {
    INTERPOLATION_RE.is_match(content)
}

/// Content contains a `${...}` span whose `$` is not backslash-escaped.
pub fn has_unescaped_interpolation(content: &str) -> bool {
    let chars: Vec<char> = content.chars().collect();
    INTERPOLATION_RE.find_iter(content).any(|m| {
        let start = content[..m.start()].chars().count();
        start == 0 || chars[start - 1] != '\\'
    })
}

/// Content is wrapped in braces as a whole, not merely containing them.
pub fn is_brace_wrapped(content: &str) -> bool {
    content.starts_with('{') && content.ends_with('}')
}

/// Neither interpolation nor a whole-content brace wrap.
pub fn is_plain_string(content: &str) -> bool {
    !has_interpolation(content) && !is_brace_wrapped(content)
}

pub fn has_backticks(content: &str) -> bool {
    content.contains('`')
}

/// Where the cursor sits relative to backticks and interpolation spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateStringInfo {
    pub within_backticks: bool,
    pub in_template_string: bool,
    /// Columns of the enclosing backtick pair, when both sit on the cursor line
    pub backtick_positions: Option<(Position, Position)>,
}

/// Classify the cursor's template-string context.
///
/// When both backticks sit on the cursor line the classification is purely
/// line-local. Otherwise a bounded multi-line probe looks for an open
/// backtick above and a closing one below, treating `;` and `,` as
/// statement terminators that end the search.
///
/// With `convert_within_template_string` set, `within_backticks` instead
/// reports whether a `${` opener exists after the opening backtick, which is
/// what the forward-conversion path keys on.
pub fn template_string_info(
    line: &str,
    current_char: usize,
    cursor_line: usize,
    source: &dyn LineSource,
    convert_within_template_string: bool,
) -> TemplateStringInfo {
    let chars: Vec<char> = line.chars().collect();
    let cur = current_char.min(chars.len());

    let start_index = index_of_char(&chars[..cur], '`');
    let end_rel = index_of_char(&chars[cur..], '`');
    let within_line = start_index >= 0 && end_rel >= 0;

    if within_line {
        let start_index = start_index as usize;
        let end_index = cur + end_rel as usize;

        // Bracket offsets mirror the line-local classification: the `${`
        // offset is taken relative to the opening backtick, the `}` is then
        // looked up between that offset and the closing backtick.
        let start_bracket = index_of_str(&chars[start_index..], "${");
        let brace_from = ((start_bracket + 1).max(0) as usize).min(chars.len());
        let end_bracket = if brace_from <= end_index {
            index_of_char(&chars[brace_from..end_index], '}')
        } else {
            -1
        };

        let within_backticks = end_index > 0;
        let in_template_string = within_backticks
            && start_bracket > 0
            && end_bracket > 0
            && (end_index as i64) > end_bracket;
        let backtick_positions = Some((
            Position::new(cursor_line, start_index),
            Position::new(cursor_line, end_index),
        ));

        if !convert_within_template_string {
            TemplateStringInfo {
                within_backticks,
                in_template_string,
                backtick_positions,
            }
        } else {
            TemplateStringInfo {
                within_backticks: start_bracket > 0,
                in_template_string,
                backtick_positions,
            }
        }
    } else {
        let before: String = chars[..cur].iter().collect();
        let after: String = chars[cur..].iter().collect();
        let within_backticks = has_backtick_towards(cursor_line, &before, source, Direction::Up)
            && has_backtick_towards(cursor_line, &after, source, Direction::Down);
        TemplateStringInfo {
            within_backticks,
            in_template_string: false,
            backtick_positions: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Probe for an unterminated backtick in one direction.
///
/// The first examined text is the partial cursor line; subsequent iterations
/// walk whole lines. A `;` or `,` before any backtick means the string ended
/// and the probe gives up.
fn has_backtick_towards(
    cursor_line: usize,
    partial_line: &str,
    source: &dyn LineSource,
    direction: Direction,
) -> bool {
    let mut line_index = cursor_line as i64;
    if direction == Direction::Up {
        line_index -= 1;
    }
    let mut current: String = partial_line.to_string();

    loop {
        let in_range = match direction {
            Direction::Up => line_index >= 0,
            Direction::Down => line_index < source.line_count() as i64,
        };
        if !in_range {
            return false;
        }

        let chars: Vec<char> = current.chars().collect();
        let backtick = index_of_char(&chars, '`');
        let semicolon = index_of_char(&chars, ';');
        let comma = index_of_char(&chars, ',');

        if backtick >= 0 && semicolon >= 0 {
            return semicolon < backtick;
        }
        if backtick >= 0 && comma >= 0 {
            return comma < backtick;
        }
        if backtick >= 0 {
            return true;
        }
        if semicolon >= 0 || comma >= 0 {
            return false;
        }

        if line_index > -1 {
            match source.line_text(line_index as usize) {
                Some(text) => current = text.into_owned(),
                None => return false,
            }
        }
        match direction {
            Direction::Up => line_index -= 1,
            Direction::Down => line_index += 1,
        }
    }
}

fn index_of_char(chars: &[char], target: char) -> i64 {
    chars
        .iter()
        .position(|&c| c == target)
        .map_or(-1, |i| i as i64)
}

fn index_of_str(chars: &[char], needle: &str) -> i64 {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || chars.len() < needle.len() {
        return -1;
    }
    (0..=chars.len() - needle.len())
        .find(|&i| chars[i..i + needle.len()] == needle[..])
        .map_or(-1, |i| i as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    #[test]
    fn test_has_interpolation() {
        assert!(has_interpolation("Hello ${name}"));
        assert!(has_interpolation("${}"));
        assert!(!has_interpolation("Hello {name}"));
        assert!(!has_interpolation("Hello $name"));
        assert!(!has_interpolation("Hello ${name")); // unterminated
    }

    #[test]
    fn test_classification_is_pure() {
        let content = "a ${b} c";
        assert_eq!(has_interpolation(content), has_interpolation(content));
        assert_eq!(is_brace_wrapped(content), is_brace_wrapped(content));
        assert_eq!(is_plain_string(content), is_plain_string(content));
    }

    #[test]
    fn test_is_brace_wrapped() {
        assert!(is_brace_wrapped("{expr}"));
        assert!(is_brace_wrapped("{a {b} c}"));
        assert!(!is_brace_wrapped("a {b} c"));
        assert!(!is_brace_wrapped("{unclosed"));
    }

    #[test]
    fn test_is_plain_string() {
        assert!(is_plain_string("just text"));
        assert!(!is_plain_string("${x}"));
        assert!(!is_plain_string("{x}"));
    }

    #[test]
    fn test_has_unescaped_interpolation() {
        assert!(has_unescaped_interpolation("a ${x}"));
        assert!(!has_unescaped_interpolation(r"a \${x}"));
        assert!(has_unescaped_interpolation(r"a \${x} and ${y}"));
    }

    #[test]
    fn test_template_info_in_template_string() {
        let line = "const m = `Hello ${name}`;";
        let buf = RopeBuffer::from_text(line);
        // Cursor inside the interpolation body
        let info = template_string_info(line, 20, 0, &buf, false);
        assert!(info.within_backticks);
        assert!(info.in_template_string);
        let (start, end) = info.backtick_positions.unwrap();
        assert_eq!(start.column, 10);
        assert_eq!(end.column, 24);
    }

    #[test]
    fn test_template_info_backticks_without_interpolation() {
        let line = "const m = `Hello {name}`;";
        let buf = RopeBuffer::from_text(line);
        let info = template_string_info(line, 19, 0, &buf, false);
        assert!(info.within_backticks);
        assert!(!info.in_template_string);
        assert!(info.backtick_positions.is_some());
    }

    #[test]
    fn test_template_info_outside_backticks() {
        let line = "const m = \"Hello\";";
        let buf = RopeBuffer::from_text(line);
        let info = template_string_info(line, 13, 0, &buf, true);
        assert!(!info.within_backticks);
        assert!(!info.in_template_string);
    }

    #[test]
    fn test_multiline_probe_finds_open_backtick() {
        let text = "let x = 1\nconst m = `start\nmiddle ${x}\nend`\n";
        let buf = RopeBuffer::from_text(text);
        let line = "middle ${x}";
        let info = template_string_info(line, 7, 2, &buf, false);
        assert!(info.within_backticks);
        assert!(info.backtick_positions.is_none());
    }

    #[test]
    fn test_multiline_probe_stops_at_terminator() {
        let text = "const a = 1;\nplain ${x} here\nconst b = 2;";
        let buf = RopeBuffer::from_text(text);
        let line = "plain ${x} here";
        let info = template_string_info(line, 6, 1, &buf, false);
        assert!(!info.within_backticks);
    }
}

//! Whole-document scanner
//!
//! Batch counterpart to the on-type dispatcher: finds every quoted string
//! that already carries a `${...}` interpolation and swaps its delimiters
//! for backticks in one atomic edit. Used by the CLI and the bulk-convert
//! command.

use regex::Regex;
use std::sync::LazyLock;

use crate::buffer::{ApplyError, LineSource, Replacement, TextBufferMut};
use crate::context;
use crate::interpolation::{has_backticks, has_interpolation};
use crate::util::char_col;

/// Complete single-line string literals, double- or single-quoted, with
/// escape pairs skipped.
static QUOTED_STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:\\.|[^\\"])*"|'(?:\\.|[^\\'])*'"#).expect("quoted string pattern")
});

/// A string literal that should become a template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMatch {
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub content: String,
}

/// Scan every line for conversion candidates.
///
/// A literal qualifies when its content holds a complete interpolation, no
/// backtick, and the surrounding line context is eligible (not a comment,
/// import or regex literal).
pub fn find_candidates(source: &dyn LineSource) -> Vec<ScanMatch> {
    let mut matches = Vec::new();

    for line in 0..source.line_count() {
        let Some(text) = source.line_text(line) else {
            continue;
        };
        let text = text.as_ref();

        for m in QUOTED_STRING_RE.find_iter(text) {
            let literal = m.as_str();
            let content = &literal[1..literal.len() - 1];
            if !has_interpolation(content) || has_backticks(content) {
                continue;
            }
            let start_col = char_col(text, m.start());
            if !context::is_eligible(text, start_col) {
                continue;
            }
            matches.push(ScanMatch {
                line,
                start_col,
                end_col: char_col(text, m.end()) - 1,
                content: content.to_string(),
            });
        }
    }
    matches
}

/// Convert every candidate in the buffer to a template string.
///
/// All delimiter swaps land as one atomic edit; the candidate count is
/// returned.
pub fn convert_document<B: TextBufferMut>(buffer: &mut B) -> Result<usize, ApplyError> {
    let candidates = find_candidates(buffer);
    let edits: Vec<Replacement> = candidates
        .iter()
        .flat_map(|c| {
            [
                Replacement::char_at(c.line, c.start_col, "`"),
                Replacement::char_at(c.line, c.end_col, "`"),
            ]
        })
        .collect();

    buffer.apply_edits(&edits)?;
    if !candidates.is_empty() {
        tracing::info!("converted {} string(s) to template strings", candidates.len());
    }
    Ok(candidates.len())
}

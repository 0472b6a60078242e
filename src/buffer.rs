//! Text buffer traits and the rope-backed implementation.
//!
//! `TextBuffer` is the read-only view the classification passes run against;
//! `TextBufferMut` adds mutation, including the atomic multi-range replace
//! that every rewrite goes through. The host editor is modeled as nothing
//! more than these traits.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::position::Position;

/// A single-line range substitution, expressed in char columns.
///
/// `start == end` is a pure insertion. Delimiter swaps are exactly one
/// character wide so the interior content of a region is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl Replacement {
    /// Replace the single character at `(line, column)`.
    pub fn char_at(line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            start: Position::new(line, column),
            end: Position::new(line, column + 1),
            text: text.into(),
        }
    }

    /// Insert text at `(line, column)` without removing anything.
    pub fn insert_at(line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            start: Position::new(line, column),
            end: Position::new(line, column),
            text: text.into(),
        }
    }
}

/// Why an atomic replace was rejected. Nothing is applied when this is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApplyError {
    #[error("edit position {0} is outside the buffer")]
    OutOfBounds(Position),

    #[error("edit at {0} spans multiple lines")]
    MultiLine(Position),

    #[error("overlapping edits at {0}")]
    Overlap(Position),
}

/// Read-only view into a text buffer for region classification.
pub trait TextBuffer {
    /// Number of lines (always >= 1)
    fn line_count(&self) -> usize;

    /// Length of a specific line in chars (excluding newline)
    fn line_length(&self, line: usize) -> usize;

    /// Total length in chars
    fn len_chars(&self) -> usize;

    /// Get character at position, None if out of bounds
    fn char_at(&self, line: usize, column: usize) -> Option<char>;

    /// Get line content (without trailing newline)
    fn line(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Convert (line, column) to char offset
    fn position_to_offset(&self, line: usize, column: usize) -> usize;

    /// Convert char offset to (line, column)
    fn offset_to_position(&self, offset: usize) -> Position;

    /// Get full content as String (may be expensive for large buffers)
    fn content(&self) -> String;
}

/// Anything that can hand out line texts. Implemented for live buffers and
/// for shadow snapshots, so before/after classification runs the same code.
pub trait LineSource {
    fn line_count(&self) -> usize;
    fn line_text(&self, line: usize) -> Option<Cow<'_, str>>;
}

impl<B: TextBuffer> LineSource for B {
    fn line_count(&self) -> usize {
        TextBuffer::line_count(self)
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.line(line)
    }
}

/// Mutable buffer operations. Extends TextBuffer.
pub trait TextBufferMut: TextBuffer {
    /// Insert text at char offset
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove text in char range
    fn remove(&mut self, range: Range<usize>);

    /// Replace text in range with new text
    fn replace(&mut self, range: Range<usize>, text: &str) {
        self.remove(range.clone());
        self.insert(range.start, text);
    }

    /// Apply a set of single-line edits as one atomic operation.
    ///
    /// Every edit is validated before anything is touched; on error the
    /// buffer is unchanged. Edits are applied back to front so earlier
    /// columns stay valid. Two edits may share a boundary column (a
    /// zero-width insert next to a one-char swap); the inserted text ends
    /// up before the swapped character, matching editor edit semantics.
    fn apply_edits(&mut self, edits: &[Replacement]) -> Result<(), ApplyError> {
        for edit in edits {
            if edit.start.line != edit.end.line {
                return Err(ApplyError::MultiLine(edit.start));
            }
            if edit.start.line >= self.line_count() {
                return Err(ApplyError::OutOfBounds(edit.start));
            }
            let line_len = self.line_length(edit.start.line);
            if edit.start.column > edit.end.column || edit.end.column > line_len {
                return Err(ApplyError::OutOfBounds(edit.end));
            }
        }

        let mut ordered: Vec<&Replacement> = edits.iter().collect();
        ordered.sort_by_key(|e| (e.start.line, e.start.column, e.end.column));
        for pair in ordered.windows(2) {
            if pair[0].start.line == pair[1].start.line
                && pair[1].start.column < pair[0].end.column
            {
                return Err(ApplyError::Overlap(pair[1].start));
            }
        }

        for edit in ordered.iter().rev() {
            let start = self.position_to_offset(edit.start.line, edit.start.column);
            let end = self.position_to_offset(edit.end.line, edit.end.column);
            self.replace(start..end, &edit.text);
        }
        Ok(())
    }
}

// =============================================================================
// RopeBuffer - rope-backed document buffer
// =============================================================================

/// TextBuffer implementation wrapping ropey::Rope.
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    fn line_length(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let len = line_slice.len_chars();
        // Exclude trailing newline if present
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, line: usize, column: usize) -> Option<char> {
        if line >= self.rope.len_lines() || column >= self.line_length(line) {
            return None;
        }
        Some(self.rope.char(self.rope.line_to_char(line) + column))
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line).to_string();
        let trimmed = s.trim_end_matches(['\n', '\r']).to_string();
        Some(Cow::Owned(trimmed))
    }

    fn position_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line) + column.min(self.line_length(line))
    }

    fn offset_to_position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        Position::new(line, clamped - self.rope.line_to_char(line))
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }
}

impl TextBufferMut for RopeBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        let clamped = offset.min(self.len_chars());
        self.rope.insert(clamped, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start < end {
            self.rope.remove(start..end);
        }
    }
}

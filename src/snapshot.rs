//! Shadow document snapshots
//!
//! Reversion needs to compare the line as it was before a deletion with the
//! line as it is now. The dispatcher keeps one snapshot per document and
//! refreshes it after every handled edit.

use std::borrow::Cow;

use crate::buffer::{LineSource, TextBuffer};

/// An immutable copy of a document's lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSnapshot {
    lines: Vec<String>,
}

impl DocumentSnapshot {
    pub fn capture<B: TextBuffer>(buffer: &B) -> Self {
        let lines = (0..TextBuffer::line_count(buffer))
            .map(|i| buffer.line(i).map(Cow::into_owned).unwrap_or_default())
            .collect();
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }
}

impl LineSource for DocumentSnapshot {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> Option<Cow<'_, str>> {
        self.line(line).map(Cow::Borrowed)
    }
}

//! Small text helpers shared by the regex-based scanners.
//!
//! Regex matches report byte offsets while the rest of the crate works in
//! char columns; these conversions live here so each scanner doesn't roll
//! its own.

/// Char column of a byte offset returned by a regex match.
pub(crate) fn char_col(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Substring by char indices, clamped to the text length.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect()
}

//! Line/column positions for buffer coordinates.
//!
//! Positions are zero-based and counted in `char` units. Regions handled by
//! this crate never span lines, so most code only moves the column.

/// A zero-based (line, column) position in a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Same line, column shifted right by `cols`.
    pub fn translate(self, cols: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + cols,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }

    #[test]
    fn test_translate() {
        assert_eq!(Position::new(1, 4).translate(2), Position::new(1, 6));
    }
}

//! Source positions.

use std::fmt;

/// Where a token, node or diagnostic sits in the source text.
///
/// Lines and columns are 1-based; columns count bytes. `len` is the byte
/// length of the covered text and is only used for caret underlining.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// A zero-width span, used for end of input and synthesized nodes.
    #[inline]
    pub fn point(line: u32, col: u32) -> Self {
        Self { line, col, len: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Extend `self` so it also covers `other`.
    ///
    /// Spans on different lines cannot be measured without the source, so
    /// the result keeps `self`'s start and sums the lengths.
    pub fn merge(self, other: Span) -> Span {
        if self.line != other.line {
            return Span::new(self.line, self.col, self.len + other.len);
        }
        let start = self.col.min(other.col);
        let end = (self.col + self.len).max(other.col + other.len);
        Span::new(self.line, start, end - start)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_line_and_column() {
        assert_eq!(Span::new(4, 17, 3).to_string(), "4:17");
    }

    #[test]
    fn point_is_empty() {
        assert!(Span::point(1, 1).is_empty());
        assert!(!Span::new(1, 1, 4).is_empty());
    }

    #[test]
    fn merge_covers_both_operands() {
        // `a + b` from the `a` and `b` spans
        let merged = Span::new(2, 5, 1).merge(Span::new(2, 9, 1));
        assert_eq!(merged, Span::new(2, 5, 5));
    }

    #[test]
    fn merge_is_order_independent_on_one_line() {
        let a = Span::new(1, 10, 2);
        let b = Span::new(1, 3, 4);
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn merge_across_lines_keeps_start() {
        let merged = Span::new(1, 8, 4).merge(Span::new(3, 2, 1));
        assert_eq!((merged.line, merged.col, merged.len), (1, 8, 5));
    }
}

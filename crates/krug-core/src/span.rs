//! Source location tracking for error reporting.
//!
//! Provides [`Span`] to track where tokens, nodes and diagnostics occur in
//! source code.

use std::fmt;

/// A half-open range of byte offsets into a unit's source text.
///
/// Tokens, AST nodes, IR identifiers and diagnostics all carry spans so that
/// a diagnostic produced late in the pipeline can still point at the text
/// that caused it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte covered.
    pub start: u32,
    /// Byte offset one past the last byte covered.
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Create a zero-length span at an offset.
    #[inline]
    pub fn point(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Merge two spans into one covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Map the start offset onto a 1-indexed `(line, column)` pair.
    ///
    /// Columns count bytes. Offsets past the end of `source` clamp to the
    /// final position.
    pub fn line_col(&self, source: &str) -> (u32, u32) {
        let offset = (self.start as usize).min(source.len());
        let mut line = 1;
        let mut col = 1;
        for (idx, byte) in source.as_bytes().iter().enumerate() {
            if idx == offset {
                break;
            }
            if *byte == b'\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// The source text covered by this span, if it lies within `source`.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start as usize..self.end as usize)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(5, 15);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());

        let empty = Span::point(5);
        assert!(empty.is_empty());
    }

    #[test]
    fn span_display() {
        let span = Span::new(3, 8);
        assert_eq!(format!("{}", span), "3..8");
        assert_eq!(format!("{:?}", span), "3..8");
    }

    #[test]
    fn span_merge_disjoint() {
        let span1 = Span::new(5, 8);
        let span2 = Span::new(10, 13);
        assert_eq!(span1.merge(span2), Span::new(5, 13));
    }

    #[test]
    fn span_merge_reverse_order() {
        let span1 = Span::new(10, 13);
        let span2 = Span::new(5, 8);
        assert_eq!(span1.merge(span2), Span::new(5, 13));
    }

    #[test]
    fn span_merge_with_point_span() {
        let span = Span::new(5, 15);
        let point = Span::point(8);
        assert_eq!(span.merge(point), span);
    }

    #[test]
    fn span_line_col() {
        let source = "fn main() {\n    let x int;\n}";
        assert_eq!(Span::point(0).line_col(source), (1, 1));
        assert_eq!(Span::point(3).line_col(source), (1, 4));
        // `let` on the second line
        assert_eq!(Span::point(16).line_col(source), (2, 5));
        // past the end clamps
        assert_eq!(Span::point(999).line_col(source), (3, 2));
    }

    #[test]
    fn span_slice() {
        let source = "let x = 1;";
        assert_eq!(Span::new(4, 5).slice(source), Some("x"));
        assert_eq!(Span::new(4, 50).slice(source), None);
    }
}

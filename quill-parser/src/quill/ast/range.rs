//! Source positions and ranges
//!
//!     Every token and node carries a [Range]: the byte span it was built from plus the
//!     zero-based line:column of both ends. Ranges are never consulted by the parser's
//!     decisions; they exist for diagnostics and tooling. Columns count bytes into the line, so
//!     a multi-byte character advances the column by its UTF-8 width.
//!
//!     [LineIndex] maps byte offsets to positions for one source text.

use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Zero-width range at a single position.
    pub fn point(offset: usize, position: Position) -> Self {
        Self::new(offset..offset, position, position)
    }

    /// Inclusive on both ends, so a caret just after the last character is still inside.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Smallest range spanning both `self` and `other`.
    pub fn cover(&self, other: &Range) -> Range {
        let (span_start, start) = if other.start < self.start {
            (other.span.start, other.start)
        } else {
            (self.span.start, self.start)
        };
        let (span_end, end) = if other.end > self.end {
            (other.span.end, other.end)
        } else {
            (self.span.end, self.end)
        };
        Range::new(span_start..span_end, start, end)
    }

    /// The cover of every range in `ranges`, or `None` when there are none.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<Range>
    where
        I: Iterator<Item = &'a Range>,
    {
        let first = ranges.next()?.clone();
        Some(ranges.fold(first, |acc, range| acc.cover(range)))
    }

    /// The source text under this range; empty when the span does not fit `source`.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.clone()).unwrap_or("")
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::point(0, Position::default())
    }
}

/// Byte offset of every line start in a source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, byte)| *byte == b'\n')
                    .map(|(offset, _)| offset + 1),
            )
            .collect();
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        Position::new(line, offset - self.line_starts[line])
    }

    pub fn range(&self, span: ByteRange<usize>) -> Range {
        let start = self.position(span.start);
        let end = self.position(span.end);
        Range::new(span, start, end)
    }
}

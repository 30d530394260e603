//! Source positions and offset <-> line/column conversion
//!
//! Offsets are 0-based byte indices into the document. Lines and columns are
//! 1-based, columns counted in bytes like the rest of the linter.

use crate::mdast::Node;
use serde::Serialize;

/// A concrete location in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Point {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, bytes)
    pub column: usize,
    /// Byte offset in the document (0-indexed)
    pub offset: usize,
}

impl Point {
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }
}

/// One end of a node's span.
///
/// Nodes inserted by transforms rather than read from the source carry
/// `Synthetic` positions and must be skipped by rules and range logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    Real(Point),
    #[default]
    Synthetic,
}

impl Position {
    pub fn is_real(&self) -> bool {
        matches!(self, Position::Real(_))
    }

    pub fn point(&self) -> Option<Point> {
        match self {
            Position::Real(point) => Some(*point),
            Position::Synthetic => None,
        }
    }

    pub fn offset(&self) -> Option<usize> {
        self.point().map(|p| p.offset)
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Position::Real(point)
    }
}

/// Start and end of a node in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Point, end: Point) -> Self {
        debug_assert!(start.offset <= end.offset);
        Self {
            start: Position::Real(start),
            end: Position::Real(end),
        }
    }

    pub const fn synthetic() -> Self {
        Self {
            start: Position::Synthetic,
            end: Position::Synthetic,
        }
    }

    /// Both ends carry real source information
    pub fn is_real(&self) -> bool {
        self.start.is_real() && self.end.is_real()
    }

    /// Byte range covered by the span, when both ends are real
    pub fn byte_range(&self) -> Option<std::ops::Range<usize>> {
        match (self.start, self.end) {
            (Position::Real(start), Position::Real(end)) => Some(start.offset..end.offset),
            _ => None,
        }
    }
}

/// Whether a node lacks real positional information
pub fn is_generated(node: &Node) -> bool {
    !node.position.is_real()
}

/// Pre-computed line table for a document.
///
/// Built once per document; every lookup is total and returns `None` for
/// input that does not denote a place in the text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset at which each line starts
    line_starts: Vec<usize>,
    /// Document length in bytes
    len: usize,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut line_starts = Vec::with_capacity(content.len() / 32 + 1);
        line_starts.push(0);
        let mut pos = 0;
        for line in content.split('\n') {
            pos += line.len() + 1; // +1 for the removed newline
            if pos <= content.len() {
                line_starts.push(pos);
            }
        }
        Self {
            line_starts,
            len: content.len(),
        }
    }

    /// Number of lines (a trailing newline opens an empty last line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Document length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of a line in bytes, without its newline
    fn line_len(&self, line_idx: usize) -> usize {
        match self.line_starts.get(line_idx + 1) {
            Some(next) => next - self.line_starts[line_idx] - 1,
            None => self.len - self.line_starts[line_idx],
        }
    }

    /// Convert a 1-based line/column pair into a byte offset.
    ///
    /// The slot right after the last character of a line (where its newline
    /// sits) is addressable; anything further right is not.
    pub fn to_offset(&self, line: usize, column: usize) -> Option<usize> {
        if line == 0 || column == 0 {
            return None;
        }
        let line_idx = line - 1;
        let start = *self.line_starts.get(line_idx)?;
        if column - 1 > self.line_len(line_idx) {
            return None;
        }
        Some(start + column - 1)
    }

    /// Convert a byte offset into a point. `offset == len` is the end of file.
    pub fn to_point(&self, offset: usize) -> Option<Point> {
        if offset > self.len {
            return None;
        }
        let line_idx = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line_idx];
        Some(Point::new(line_idx + 1, offset - line_start + 1, offset))
    }
}

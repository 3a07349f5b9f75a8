//! Source location tracking for tokens and AST nodes.

use serde::{Deserialize, Serialize};

/// A half-open byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merges two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

/// The position of a node in the statement text.
///
/// Both offsets are inclusive byte offsets, so a one-character token at
/// offset 28 has `begin_offset == end_offset == 28`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Offset of the first byte covered by the node.
    pub begin_offset: usize,
    /// Offset of the last byte covered by the node.
    pub end_offset: usize,
}

impl Position {
    /// Creates a position from inclusive offsets.
    #[must_use]
    pub const fn new(begin_offset: usize, end_offset: usize) -> Self {
        Self {
            begin_offset,
            end_offset,
        }
    }

    /// Widens this position to also cover `other`.
    #[must_use]
    pub const fn extend(self, other: Self) -> Self {
        let begin_offset = if self.begin_offset < other.begin_offset {
            self.begin_offset
        } else {
            other.begin_offset
        };
        let end_offset = if self.end_offset > other.end_offset {
            self.end_offset
        } else {
            other.end_offset
        };
        Self {
            begin_offset,
            end_offset,
        }
    }
}

impl From<Span> for Position {
    fn from(span: Span) -> Self {
        Self {
            begin_offset: span.start,
            end_offset: span.end.saturating_sub(1).max(span.start),
        }
    }
}

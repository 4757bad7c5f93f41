//! Offset ranges, positions and line ranges shared by every diff stage

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open range `[start, end_exclusive)` of offsets into one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end_exclusive: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        debug_assert!(
            start <= end_exclusive,
            "invalid offset range [{start}, {end_exclusive})"
        );
        Self {
            start,
            end_exclusive,
        }
    }

    /// An empty range positioned at `offset`
    pub fn empty_at(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end_exclusive - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end_exclusive
    }

    /// Translate both ends by `delta`
    pub fn delta(self, delta: isize) -> Self {
        Self::new(
            self.start.wrapping_add_signed(delta),
            self.end_exclusive.wrapping_add_signed(delta),
        )
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end_exclusive
    }

    /// The smallest range covering both `self` and `other`
    pub fn join(self, other: Self) -> Self {
        Self::new(
            self.start.min(other.start),
            self.end_exclusive.max(other.end_exclusive),
        )
    }
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end_exclusive)
    }
}

/// A span of sequence 1 that corresponds to a span of sequence 2 and differs from it.
///
/// Either range may be empty (pure insertion or pure deletion), never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SequenceDiff {
    pub seq1_range: OffsetRange,
    pub seq2_range: OffsetRange,
}

impl SequenceDiff {
    pub fn new(seq1_range: OffsetRange, seq2_range: OffsetRange) -> Self {
        Self {
            seq1_range,
            seq2_range,
        }
    }

    /// Swap the roles of the two sequences
    pub fn reverse(self) -> Self {
        Self::new(self.seq2_range, self.seq1_range)
    }

    pub fn delta(self, delta: isize) -> Self {
        Self::new(self.seq1_range.delta(delta), self.seq2_range.delta(delta))
    }

    pub fn join(self, other: Self) -> Self {
        Self::new(
            self.seq1_range.join(other.seq1_range),
            self.seq2_range.join(other.seq2_range),
        )
    }
}

impl fmt::Display for SequenceDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.seq1_range, self.seq2_range)
    }
}

/// A 1-based (line, column) position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line_number: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line_number: usize, column: usize) -> Self {
        Self {
            line_number,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_number, self.column)
    }
}

/// A character-precise range between two positions, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start_line_number: usize,
    pub start_column: usize,
    pub end_line_number: usize,
    pub end_column: usize,
}

impl TextRange {
    pub fn new(
        start_line_number: usize,
        start_column: usize,
        end_line_number: usize,
        end_column: usize,
    ) -> Self {
        Self {
            start_line_number,
            start_column,
            end_line_number,
            end_column,
        }
    }

    pub fn from_positions(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "text range {start} .. {end} is reversed");
        Self::new(start.line_number, start.column, end.line_number, end.column)
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_line_number, self.start_column)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line_number, self.end_column)
    }

    pub fn is_empty(&self) -> bool {
        self.start() == self.end()
    }

    /// Move the range down by `line_delta` lines
    pub fn delta(self, line_delta: usize) -> Self {
        Self::new(
            self.start_line_number + line_delta,
            self.start_column,
            self.end_line_number + line_delta,
            self.end_column,
        )
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start(), self.end())
    }
}

/// A range of whole lines `[start_line_number, end_line_number_exclusive)`, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start_line_number: usize,
    pub end_line_number_exclusive: usize,
}

impl LineRange {
    pub fn new(start_line_number: usize, end_line_number_exclusive: usize) -> Self {
        debug_assert!(start_line_number <= end_line_number_exclusive);
        Self {
            start_line_number,
            end_line_number_exclusive,
        }
    }

    pub fn len(&self) -> usize {
        self.end_line_number_exclusive - self.start_line_number
    }

    pub fn is_empty(&self) -> bool {
        self.start_line_number == self.end_line_number_exclusive
    }

    pub fn contains(&self, line_number: usize) -> bool {
        self.start_line_number <= line_number && line_number < self.end_line_number_exclusive
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start_line_number, self.end_line_number_exclusive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range_basics() {
        let range = OffsetRange::new(2, 5);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert!(OffsetRange::empty_at(7).is_empty());
    }

    #[test]
    fn test_offset_range_delta_and_join() {
        let range = OffsetRange::new(4, 6);
        assert_eq!(range.delta(-2), OffsetRange::new(2, 4));
        assert_eq!(range.delta(3), OffsetRange::new(7, 9));
        assert_eq!(
            range.join(OffsetRange::new(9, 10)),
            OffsetRange::new(4, 10)
        );
    }

    #[test]
    fn test_sequence_diff_reverse() {
        let diff = SequenceDiff::new(OffsetRange::new(1, 1), OffsetRange::new(1, 3));
        let reversed = diff.reverse();
        assert_eq!(reversed.seq1_range, OffsetRange::new(1, 3));
        assert_eq!(reversed.reverse(), diff);
        assert_eq!(diff.to_string(), "[1, 1) -> [1, 3)");
    }

    #[test]
    fn test_text_range_delta() {
        let range = TextRange::new(1, 3, 2, 1).delta(4);
        assert_eq!(range.start(), Position::new(5, 3));
        assert_eq!(range.end(), Position::new(6, 1));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_line_range() {
        let lines = LineRange::new(3, 5);
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(4));
        assert!(!lines.contains(5));
        assert!(LineRange::new(2, 2).is_empty());
    }
}

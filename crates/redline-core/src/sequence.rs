//! Sequences the aligners operate on
//!
//! Both aligners and the optimizer are written once against [`Sequence`] and
//! reused for line granularity ([`LineSequence`]) and character granularity
//! ([`CharSlice`]).

use crate::range::{OffsetRange, Position, TextRange};
use std::collections::HashMap;

/// Comparable elements with a notion of boundary quality
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The comparison key of the element at `offset`
    fn element(&self, offset: usize) -> u32;

    /// How desirable it is to place a diff boundary right before `offset`.
    ///
    /// Defined for `0 <= offset <= len()`.
    fn boundary_score(&self, offset: usize) -> i32;
}

/// Assigns dense ids to distinct line contents, starting at 0 in order of first
/// appearance, so `len()` is both the number of distinct lines and the next id.
///
/// Scoped to a single diff computation and shared by both documents, so equal
/// text anywhere in either document gets the same id.
#[derive(Debug, Default)]
pub struct LineInterner<'a> {
    ids: HashMap<&'a str, u32>,
}

impl<'a> LineInterner<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &'a str) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(text).or_insert(next)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A document's lines, compared by the id of their trimmed text
pub struct LineSequence<'a, S> {
    trimmed_hashes: Vec<u32>,
    lines: &'a [S],
}

impl<'a, S: AsRef<str>> LineSequence<'a, S> {
    pub fn new(lines: &'a [S], interner: &mut LineInterner<'a>) -> Self {
        let trimmed_hashes = lines
            .iter()
            .map(|line| interner.intern(line.as_ref().trim()))
            .collect();
        Self {
            trimmed_hashes,
            lines,
        }
    }

    pub fn line(&self, offset: usize) -> &'a str {
        self.lines[offset].as_ref()
    }
}

impl<S: AsRef<str>> Sequence for LineSequence<'_, S> {
    fn len(&self) -> usize {
        self.trimmed_hashes.len()
    }

    fn element(&self, offset: usize) -> u32 {
        self.trimmed_hashes[offset]
    }

    fn boundary_score(&self, offset: usize) -> i32 {
        let before = if offset == 0 {
            0
        } else {
            indentation(self.line(offset - 1))
        };
        let after = if offset == self.lines.len() {
            0
        } else {
            indentation(self.line(offset))
        };
        1000 - (before + after) as i32
    }
}

/// Number of leading spaces and tabs
fn indentation(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ' || c == '\t').count()
}

/// The characters of a contiguous range of lines, each line terminated by `\n`
#[derive(Debug, Clone)]
pub struct CharSlice {
    elements: Vec<u32>,
    /// Offset of the first character of the line following each line in the slice
    next_line_offsets: Vec<usize>,
    line_range: OffsetRange,
}

impl CharSlice {
    pub fn new<S: AsRef<str>>(lines: &[S], line_range: OffsetRange) -> Self {
        let mut elements = Vec::new();
        let mut next_line_offsets = Vec::with_capacity(line_range.len());
        for line in &lines[line_range.start..line_range.end_exclusive] {
            elements.extend(line.as_ref().chars().map(u32::from));
            elements.push(u32::from('\n'));
            next_line_offsets.push(elements.len());
        }
        Self {
            elements,
            next_line_offsets,
            line_range,
        }
    }

    pub fn line_range(&self) -> OffsetRange {
        self.line_range
    }

    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|&code| char::from_u32(code))
            .collect()
    }

    /// Map a character offset to a position relative to the slice's first line.
    ///
    /// Binary search over the line table: finds the first line whose successor
    /// starts after `offset`.
    pub fn translate_offset(&self, offset: usize) -> Position {
        let line = self.next_line_offsets.partition_point(|&next| next <= offset);
        let line_start = if line == 0 {
            0
        } else {
            self.next_line_offsets[line - 1]
        };
        Position::new(line + 1, offset - line_start + 1)
    }

    pub fn translate_range(&self, range: OffsetRange) -> TextRange {
        TextRange::from_positions(
            self.translate_offset(range.start),
            self.translate_offset(range.end_exclusive),
        )
    }
}

impl Sequence for CharSlice {
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn element(&self, offset: usize) -> u32 {
        self.elements[offset]
    }

    //   a   b   c   ,           d   e   f
    // 11  0   0   12  15  6   13  0   0   11
    fn boundary_score(&self, offset: usize) -> i32 {
        let prev = CharBoundaryCategory::of(offset.checked_sub(1).map(|i| self.elements[i]));
        let next = CharBoundaryCategory::of(self.elements.get(offset).copied());

        if prev == CharBoundaryCategory::LineBreakCr && next == CharBoundaryCategory::LineBreakLf {
            // never split a CRLF pair
            return 0;
        }

        let mut score = 0;
        if prev != next {
            score += 10;
            if next == CharBoundaryCategory::WordUpper {
                score += 1;
            }
        }
        score + prev.score() + next.score()
    }
}

/// Classification of the characters on either side of a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharBoundaryCategory {
    WordLower,
    WordUpper,
    WordNumber,
    End,
    Other,
    Space,
    LineBreakCr,
    LineBreakLf,
}

impl CharBoundaryCategory {
    /// Category of a character code; `None` is the edge of the slice
    pub fn of(code: Option<u32>) -> Self {
        let Some(ch) = code.and_then(char::from_u32) else {
            return match code {
                None => Self::End,
                Some(_) => Self::Other,
            };
        };
        match ch {
            '\n' => Self::LineBreakLf,
            '\r' => Self::LineBreakCr,
            ' ' | '\t' => Self::Space,
            'a'..='z' => Self::WordLower,
            'A'..='Z' => Self::WordUpper,
            '0'..='9' => Self::WordNumber,
            _ => Self::Other,
        }
    }

    pub fn score(self) -> i32 {
        match self {
            Self::WordLower | Self::WordUpper | Self::WordNumber => 0,
            Self::End => 10,
            Self::Other => 2,
            Self::Space => 3,
            Self::LineBreakCr | Self::LineBreakLf => 10,
        }
    }
}

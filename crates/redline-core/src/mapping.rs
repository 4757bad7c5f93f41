//! Character and line granularity change mappings

use crate::range::{LineRange, TextRange};
use serde::{Deserialize, Serialize};

/// A character-precise correspondence between original and modified text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeMapping {
    pub original_range: TextRange,
    pub modified_range: TextRange,
}

impl RangeMapping {
    pub fn new(original_range: TextRange, modified_range: TextRange) -> Self {
        Self {
            original_range,
            modified_range,
        }
    }
}

/// A block of changed lines, with the character level changes inside it.
///
/// `inner_changes` is empty only when no character level refinement was done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRangeMapping {
    pub original_range: LineRange,
    pub modified_range: LineRange,
    pub inner_changes: Vec<RangeMapping>,
}

impl LineRangeMapping {
    pub fn new(
        original_range: LineRange,
        modified_range: LineRange,
        inner_changes: Vec<RangeMapping>,
    ) -> Self {
        Self {
            original_range,
            modified_range,
            inner_changes,
        }
    }
}

/// Group an ordered list of character mappings into line blocks.
///
/// Mappings end up in the same block when the next one starts at most one line
/// below where the previous one ends, in either document. A mapping that ends
/// at column 1 ends before that line, so the line itself does not count.
pub fn line_range_mappings_from_range_mappings(
    alignments: Vec<RangeMapping>,
) -> Vec<LineRangeMapping> {
    let mut changes = Vec::new();
    let mut group: Vec<RangeMapping> = Vec::new();

    for alignment in alignments {
        if let Some(last) = group.last() {
            if !should_group(last, &alignment) {
                changes.push(close_group(std::mem::take(&mut group)));
            }
        }
        group.push(alignment);
    }
    if !group.is_empty() {
        changes.push(close_group(group));
    }

    debug_assert!(
        changes.windows(2).all(|pair| is_separated(&pair[0], &pair[1])),
        "line range mappings must be separated by the same number of unchanged lines on both sides"
    );

    changes
}

fn should_group(a1: &RangeMapping, a2: &RangeMapping) -> bool {
    fn last_touched_line(range: &TextRange) -> usize {
        if range.end_column > 1 {
            range.end_line_number
        } else {
            range.end_line_number - 1
        }
    }

    a2.original_range
        .start_line_number
        .saturating_sub(last_touched_line(&a1.original_range))
        <= 1
        || a2
            .modified_range
            .start_line_number
            .saturating_sub(last_touched_line(&a1.modified_range))
            <= 1
}

fn close_group(group: Vec<RangeMapping>) -> LineRangeMapping {
    let first = group[0];
    let last = group[group.len() - 1];
    // a mapping that ends mid-line takes the rest of that line with it
    let extra = usize::from(last.original_range.end_column > 1 || last.modified_range.end_column > 1);

    LineRangeMapping::new(
        LineRange::new(
            first.original_range.start_line_number,
            last.original_range.end_line_number + extra,
        ),
        LineRange::new(
            first.modified_range.start_line_number,
            last.modified_range.end_line_number + extra,
        ),
        group,
    )
}

/// At least one unchanged line in between, and the same number on both sides
fn is_separated(m1: &LineRangeMapping, m2: &LineRangeMapping) -> bool {
    let original_gap = m2.original_range.start_line_number as isize
        - m1.original_range.end_line_number_exclusive as isize;
    let modified_gap = m2.modified_range.start_line_number as isize
        - m1.modified_range.end_line_number_exclusive as isize;
    original_gap == modified_gap && original_gap > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(original: (usize, usize, usize, usize), modified: (usize, usize, usize, usize)) -> RangeMapping {
        RangeMapping::new(
            TextRange::new(original.0, original.1, original.2, original.3),
            TextRange::new(modified.0, modified.1, modified.2, modified.3),
        )
    }

    #[test]
    fn test_empty_input() {
        assert!(line_range_mappings_from_range_mappings(Vec::new()).is_empty());
    }

    #[test]
    fn test_mid_line_change_covers_its_line() {
        let changes =
            line_range_mappings_from_range_mappings(vec![mapping((2, 3, 2, 6), (2, 3, 2, 6))]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].original_range, LineRange::new(2, 3));
        assert_eq!(changes[0].modified_range, LineRange::new(2, 3));
        assert_eq!(changes[0].inner_changes.len(), 1);
    }

    #[test]
    fn test_whole_line_insertion_ends_at_column_one() {
        let changes =
            line_range_mappings_from_range_mappings(vec![mapping((4, 1, 4, 1), (4, 1, 7, 1))]);
        assert_eq!(changes[0].original_range, LineRange::new(4, 4));
        assert_eq!(changes[0].modified_range, LineRange::new(4, 7));
    }

    #[test]
    fn test_changes_on_consecutive_lines_are_grouped() {
        let changes = line_range_mappings_from_range_mappings(vec![
            mapping((2, 3, 2, 6), (2, 3, 2, 6)),
            mapping((3, 4, 3, 4), (3, 4, 3, 5)),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].original_range, LineRange::new(2, 4));
        assert_eq!(changes[0].modified_range, LineRange::new(2, 4));
        assert_eq!(changes[0].inner_changes.len(), 2);
    }

    #[test]
    fn test_changes_separated_by_an_unchanged_line_are_split() {
        let changes = line_range_mappings_from_range_mappings(vec![
            mapping((1, 1, 1, 2), (1, 1, 1, 2)),
            mapping((3, 1, 3, 2), (3, 1, 3, 2)),
        ]);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].original_range, LineRange::new(1, 2));
        assert_eq!(changes[1].original_range, LineRange::new(3, 4));
    }

    #[test]
    fn test_deletion_followed_by_change_on_next_line() {
        // line 5 deleted, line 6 (now line 5) changed
        let changes = line_range_mappings_from_range_mappings(vec![
            mapping((5, 1, 6, 1), (5, 1, 5, 1)),
            mapping((6, 1, 6, 3), (5, 1, 5, 2)),
        ]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].original_range, LineRange::new(5, 7));
        assert_eq!(changes[0].modified_range, LineRange::new(5, 6));
    }
}

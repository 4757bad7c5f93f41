//! Post-processing of aligner output
//!
//! Aligners pick an arbitrary position among equally cheap alignments. These
//! passes move diff boundaries to where a human expects them and glue
//! fragments back together, without changing which elements are matched in
//! a way that would break the alignment.

use crate::range::{OffsetRange, SequenceDiff};
use crate::sequence::Sequence;

/// How far a diff may slide in either direction
const MAX_SHIFT: usize = 20;

/// Diffs separated by at most this many unchanged elements are smoothened into one
const SMOOTHING_GAP: usize = 2;

/// Join diffs that can slide into their predecessor, then slide every diff to
/// its best scoring position.
pub fn optimize_sequence_diffs<S1, S2>(
    seq1: &S1,
    seq2: &S2,
    diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff>
where
    S1: Sequence + ?Sized,
    S2: Sequence + ?Sized,
{
    let diffs = join_sequence_diffs(seq1, seq2, diffs);
    shift_sequence_diffs(seq1, seq2, diffs)
}

/// Merge diffs separated by a small unchanged gap.
///
/// `foo(a, b)` -> `foo(x, y)` reads better as one `a, b` -> `x, y` change than
/// as two single character changes.
pub fn smoothen_sequence_diffs(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match result.last_mut() {
            Some(last)
                if diff.seq1_range.start - last.seq1_range.end_exclusive <= SMOOTHING_GAP
                    || diff.seq2_range.start - last.seq2_range.end_exclusive <= SMOOTHING_GAP =>
            {
                *last = last.join(diff);
            }
            _ => result.push(diff),
        }
    }
    result
}

/// Fixes splits like this one:
///
/// ```text
/// import { Baz, Bar } from "foo";
/// import { Baz, Bar, Foo } from "foo";
/// ```
///
/// computed as `{Add ","}` after `Bar` and `{Add "Foo "}` after the space,
/// improved to a single `{Add ", Foo"}` after `Bar`.
fn join_sequence_diffs<S1, S2>(seq1: &S1, seq2: &S2, diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff>
where
    S1: Sequence + ?Sized,
    S2: Sequence + ?Sized,
{
    let mut result: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for cur in diffs {
        if let Some(last) = result.last_mut() {
            let gap = cur.seq1_range.start - last.seq1_range.end_exclusive;
            if can_slide_left(seq1, cur.seq1_range, gap) && can_slide_left(seq2, cur.seq2_range, gap) {
                *last = SequenceDiff::new(
                    OffsetRange::new(
                        last.seq1_range.start,
                        cur.seq1_range.end_exclusive - gap,
                    ),
                    OffsetRange::new(
                        last.seq2_range.start,
                        cur.seq2_range.end_exclusive - gap,
                    ),
                );
                continue;
            }
        }
        result.push(cur);
    }
    result
}

/// Whether `range` can move `by` positions to the left, one step at a time,
/// with the element entering the range equal to the one leaving it.
fn can_slide_left<S: Sequence + ?Sized>(seq: &S, range: OffsetRange, by: usize) -> bool {
    range.is_empty()
        || (1..=by).all(|i| seq.element(range.start - i) == seq.element(range.end_exclusive - i))
}

// Align character level diffs at word and whitespace boundaries:
//
// import { I[Arr, I]Bar } from "foo";
// ->
// import {[ IArr,] IBar } from "foo";
fn shift_sequence_diffs<S1, S2>(
    seq1: &S1,
    seq2: &S2,
    mut diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff>
where
    S1: Sequence + ?Sized,
    S2: Sequence + ?Sized,
{
    for i in 0..diffs.len() {
        // a slid diff keeps at least one matched element between it and its neighbors
        let lower = match i.checked_sub(1).map(|prev| diffs[prev]) {
            Some(prev) => (
                prev.seq1_range.end_exclusive + 1,
                prev.seq2_range.end_exclusive + 1,
            ),
            None => (0, 0),
        };
        let upper = match diffs.get(i + 1) {
            Some(next) => (next.seq1_range.start - 1, next.seq2_range.start - 1),
            None => (seq1.len(), seq2.len()),
        };
        diffs[i] = shift_diff_to_better_position(seq1, seq2, diffs[i], lower, upper);
    }
    diffs
}

fn shift_diff_to_better_position<S1, S2>(
    seq1: &S1,
    seq2: &S2,
    diff: SequenceDiff,
    lower: (usize, usize),
    upper: (usize, usize),
) -> SequenceDiff
where
    S1: Sequence + ?Sized,
    S2: Sequence + ?Sized,
{
    let mut delta_before = 0;
    while delta_before < MAX_SHIFT
        && can_step_left(seq1, diff.seq1_range, delta_before, lower.0)
        && can_step_left(seq2, diff.seq2_range, delta_before, lower.1)
    {
        delta_before += 1;
    }

    let mut delta_after = 0;
    while delta_after < MAX_SHIFT
        && can_step_right(seq1, diff.seq1_range, delta_after, upper.0)
        && can_step_right(seq2, diff.seq2_range, delta_after, upper.1)
    {
        delta_after += 1;
    }

    if delta_before == 0 && delta_after == 0 {
        return diff;
    }

    let score_at = |delta: isize| {
        boundary_score(seq1, diff.seq1_range.delta(delta))
            + boundary_score(seq2, diff.seq2_range.delta(delta))
    };

    let mut best_delta = 0;
    let mut best_score = score_at(0);
    for delta in -(delta_before as isize)..=delta_after as isize {
        let score = score_at(delta);
        if score > best_score {
            best_score = score;
            best_delta = delta;
        }
    }

    diff.delta(best_delta)
}

/// Slide from `-shifted` to `-(shifted + 1)` stays valid
fn can_step_left<S: Sequence + ?Sized>(
    seq: &S,
    range: OffsetRange,
    shifted: usize,
    lower: usize,
) -> bool {
    let Some(start) = range.start.checked_sub(shifted + 1) else {
        return false;
    };
    start >= lower
        && (range.is_empty() || seq.element(start) == seq.element(range.end_exclusive - shifted - 1))
}

/// Slide from `+shifted` to `+(shifted + 1)` stays valid
fn can_step_right<S: Sequence + ?Sized>(
    seq: &S,
    range: OffsetRange,
    shifted: usize,
    upper: usize,
) -> bool {
    let end = range.end_exclusive + shifted;
    end < upper
        && (range.is_empty() || seq.element(range.start + shifted) == seq.element(end))
}

fn boundary_score<S: Sequence + ?Sized>(seq: &S, range: OffsetRange) -> i32 {
    if range.is_empty() {
        seq.boundary_score(range.start)
    } else {
        seq.boundary_score(range.start) + seq.boundary_score(range.end_exclusive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{CharSlice, LineInterner, LineSequence};

    fn diff(s1: (usize, usize), s2: (usize, usize)) -> SequenceDiff {
        SequenceDiff::new(OffsetRange::new(s1.0, s1.1), OffsetRange::new(s2.0, s2.1))
    }

    fn chars(text: &str) -> CharSlice {
        CharSlice::new(&[text], OffsetRange::new(0, 1))
    }

    #[test]
    fn test_insertion_slides_to_lower_indentation() {
        let original = vec!["{", "  a", "}"];
        let modified = vec!["{", "  a", "}", "{", "  b", "}"];
        let mut interner = LineInterner::new();
        let seq1 = LineSequence::new(&original, &mut interner);
        let seq2 = LineSequence::new(&modified, &mut interner);

        // "}", "{", "  b" inserted before the last "}" is an equally cheap alignment
        let optimized = optimize_sequence_diffs(&seq1, &seq2, vec![diff((2, 2), (2, 5))]);
        assert_eq!(optimized, vec![diff((3, 3), (3, 6))]);

        // already at the best position
        let optimized = optimize_sequence_diffs(&seq1, &seq2, vec![diff((3, 3), (3, 6))]);
        assert_eq!(optimized, vec![diff((3, 3), (3, 6))]);
    }

    #[test]
    fn test_deletion_slides_like_insertion() {
        let original = vec!["{", "  a", "}", "{", "  b", "}"];
        let modified = vec!["{", "  a", "}"];
        let mut interner = LineInterner::new();
        let seq1 = LineSequence::new(&original, &mut interner);
        let seq2 = LineSequence::new(&modified, &mut interner);

        let optimized = optimize_sequence_diffs(&seq1, &seq2, vec![diff((2, 5), (2, 2))]);
        assert_eq!(optimized, vec![diff((3, 6), (3, 3))]);
    }

    #[test]
    fn test_insertion_slides_to_word_boundary() {
        // "{ I[Arr, I]Bar }" -> "{[ IArr,] IBar }"
        let a = chars("import { IBar }");
        let b = chars("import { IArr, IBar }");
        let optimized = optimize_sequence_diffs(&a, &b, vec![diff((10, 10), (10, 16))]);
        assert_eq!(optimized, vec![diff((8, 8), (8, 14))]);
    }

    #[test]
    fn test_join_with_previous_insertion() {
        let a = chars("Bar }");
        let b = chars("Bar, Foo }");
        let diffs = vec![diff((3, 3), (3, 4)), diff((4, 4), (5, 9))];
        let optimized = optimize_sequence_diffs(&a, &b, diffs);
        assert_eq!(optimized, vec![diff((3, 3), (3, 8))]);
    }

    #[test]
    fn test_substitution_slides_over_repeated_elements() {
        // "[aX]a" -> "[aY]a" can equally be "a[Xa]" -> "a[Ya]", which ends at
        // the line break
        let a = chars("aXa");
        let b = chars("aYa");
        let optimized = optimize_sequence_diffs(&a, &b, vec![diff((0, 2), (0, 2))]);
        assert_eq!(optimized, vec![diff((1, 3), (1, 3))]);
    }

    #[test]
    fn test_never_touches_neighbors() {
        let a = chars("aaaa");
        let b = chars("aaaaaaa");
        let diffs = vec![diff((1, 1), (1, 2)), diff((3, 3), (4, 6))];
        let optimized = shift_sequence_diffs(&a, &b, diffs);
        for pair in optimized.windows(2) {
            assert!(pair[0].seq1_range.end_exclusive < pair[1].seq1_range.start);
            assert!(pair[0].seq2_range.end_exclusive < pair[1].seq2_range.start);
        }
    }

    #[test]
    fn test_smoothen_merges_small_gaps() {
        let diffs = vec![diff((4, 5), (4, 5)), diff((7, 8), (7, 8))];
        assert_eq!(smoothen_sequence_diffs(diffs), vec![diff((4, 8), (4, 8))]);
    }

    #[test]
    fn test_smoothen_keeps_distant_diffs() {
        let diffs = vec![diff((0, 1), (0, 1)), diff((4, 5), (4, 6))];
        assert_eq!(smoothen_sequence_diffs(diffs.clone()), diffs);
    }
}

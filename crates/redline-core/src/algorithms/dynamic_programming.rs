//! Quadratic, high quality aligner for small inputs
//!
//! Fills an LCS-style score table over every pair of offsets. Matched elements
//! score through a pluggable equality function, and a match that extends a run
//! of matches earns the run's length on top, so long contiguous matches win
//! over scattered ones. Time and memory are O(n·m): callers must only use it
//! below their size threshold.

use super::{AlgorithmResult, Deadline, DiffAlgorithm};
use crate::range::{OffsetRange, SequenceDiff};
use crate::sequence::Sequence;

/// The dynamic programming aligner
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgrammingDiffing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Direction {
    /// Skip an element of sequence 1
    #[default]
    Horizontal,
    /// Skip an element of sequence 2
    Vertical,
    /// Match both elements
    Diagonal,
}

/// Row-major `n × m` table
struct Table<T> {
    cells: Vec<T>,
    width: usize,
}

impl<T: Copy + Default> Table<T> {
    fn new(height: usize, width: usize) -> Self {
        Self {
            cells: vec![T::default(); height * width],
            width,
        }
    }

    fn get(&self, row: usize, col: usize) -> T {
        self.cells[row * self.width + col]
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.cells[row * self.width + col] = value;
    }
}

impl DiffAlgorithm for DynamicProgrammingDiffing {
    fn compute<S1, S2>(&self, seq1: &S1, seq2: &S2, deadline: &Deadline) -> AlgorithmResult
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized,
    {
        self.compute_with_score(seq1, seq2, deadline, &|_, _| 1.0)
    }
}

impl DynamicProgrammingDiffing {
    /// Align with `equality_score(offset1, offset2)` as the value of matching
    /// two equal elements.
    pub fn compute_with_score<S1, S2>(
        &self,
        seq1: &S1,
        seq2: &S2,
        deadline: &Deadline,
        equality_score: &dyn Fn(usize, usize) -> f64,
    ) -> AlgorithmResult
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized,
    {
        let n = seq1.len();
        let m = seq2.len();
        if n == 0 || m == 0 {
            return AlgorithmResult::trivial(seq1, seq2);
        }

        let mut scores = Table::<f64>::new(n, m);
        let mut directions = Table::<Direction>::new(n, m);
        let mut run_lengths = Table::<u32>::new(n, m);

        for s1 in 0..n {
            if !deadline.is_valid() {
                return AlgorithmResult::trivial_timed_out(seq1, seq2);
            }
            for s2 in 0..m {
                let horizontal = if s1 == 0 { 0.0 } else { scores.get(s1 - 1, s2) };
                let vertical = if s2 == 0 { 0.0 } else { scores.get(s1, s2 - 1) };

                let diagonal = if seq1.element(s1) == seq2.element(s2) {
                    let mut score = if s1 == 0 || s2 == 0 {
                        0.0
                    } else {
                        scores.get(s1 - 1, s2 - 1)
                    };
                    if s1 > 0 && s2 > 0 && directions.get(s1 - 1, s2 - 1) == Direction::Diagonal {
                        score += f64::from(run_lengths.get(s1 - 1, s2 - 1));
                    }
                    score + equality_score(s1, s2)
                } else {
                    -1.0
                };

                let best = horizontal.max(vertical).max(diagonal);
                if best == diagonal {
                    let previous_run = if s1 > 0 && s2 > 0 {
                        run_lengths.get(s1 - 1, s2 - 1)
                    } else {
                        0
                    };
                    run_lengths.set(s1, s2, previous_run + 1);
                    directions.set(s1, s2, Direction::Diagonal);
                } else if best == horizontal {
                    directions.set(s1, s2, Direction::Horizontal);
                } else {
                    directions.set(s1, s2, Direction::Vertical);
                }
                scores.set(s1, s2, best);
            }
        }

        AlgorithmResult::new(backtrack(&directions, n, m))
    }
}

/// Walk the direction table from the bottom-right corner and report every gap
/// between consecutive matched pairs as a diff.
fn backtrack(directions: &Table<Direction>, n: usize, m: usize) -> Vec<SequenceDiff> {
    let mut diffs = Vec::new();
    // end of the region not yet reported, in both sequences
    let mut last_aligned = (n, m);
    let mut report = |end1: usize, end2: usize, last: &mut (usize, usize)| {
        if (end1, end2) != *last {
            diffs.push(SequenceDiff::new(
                OffsetRange::new(end1, last.0),
                OffsetRange::new(end2, last.1),
            ));
        }
        *last = (end1.saturating_sub(1), end2.saturating_sub(1));
    };

    let (mut s1, mut s2) = (n, m);
    while s1 > 0 && s2 > 0 {
        match directions.get(s1 - 1, s2 - 1) {
            Direction::Diagonal => {
                report(s1, s2, &mut last_aligned);
                s1 -= 1;
                s2 -= 1;
            }
            Direction::Horizontal => s1 -= 1,
            Direction::Vertical => s2 -= 1,
        }
    }
    report(0, 0, &mut last_aligned);

    diffs.reverse();
    diffs
}

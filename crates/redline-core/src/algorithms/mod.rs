//! Sequence alignment algorithms and the post-processing applied to their output

pub mod dynamic_programming;
pub mod myers;
pub mod optimize;

pub use dynamic_programming::DynamicProgrammingDiffing;
pub use myers::MyersDiffAlgorithm;
pub use optimize::{optimize_sequence_diffs, smoothen_sequence_diffs};

use crate::range::{OffsetRange, SequenceDiff};
use crate::sequence::Sequence;
use std::time::{Duration, Instant};

/// Output of an aligner
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmResult {
    /// Monotone, non-overlapping diffs covering every unmatched span
    pub diffs: Vec<SequenceDiff>,
    /// The deadline expired and `diffs` is a best-effort fallback
    pub hit_timeout: bool,
}

impl AlgorithmResult {
    pub fn new(diffs: Vec<SequenceDiff>) -> Self {
        Self {
            diffs,
            hit_timeout: false,
        }
    }

    /// One diff spanning both sequences entirely, or nothing if both are empty
    pub fn trivial<S1, S2>(seq1: &S1, seq2: &S2) -> Self
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized,
    {
        if seq1.is_empty() && seq2.is_empty() {
            return Self::new(Vec::new());
        }
        Self::new(vec![SequenceDiff::new(
            OffsetRange::new(0, seq1.len()),
            OffsetRange::new(0, seq2.len()),
        )])
    }

    pub fn trivial_timed_out<S1, S2>(seq1: &S1, seq2: &S2) -> Self
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized,
    {
        Self {
            hit_timeout: true,
            ..Self::trivial(seq1, seq2)
        }
    }
}

/// The point in time every aligner run of one diff must finish by
#[derive(Debug, Clone, Copy, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `budget` from now; `None` never expires
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            at: budget.and_then(|budget| Instant::now().checked_add(budget)),
        }
    }

    pub fn unbounded() -> Self {
        Self { at: None }
    }

    /// The deadline in the form `similar` takes
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    /// Whether there is time left
    pub fn is_valid(&self) -> bool {
        self.at.map_or(true, |at| Instant::now() < at)
    }
}

/// A sequence aligner: computes the diffs between two sequences
pub trait DiffAlgorithm {
    fn compute<S1, S2>(&self, seq1: &S1, seq2: &S2, deadline: &Deadline) -> AlgorithmResult
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized;
}

/// Optional weighting for matched elements, called with their offsets
pub type EqualityScore<'a> = &'a dyn Fn(usize, usize) -> f64;

/// Which aligner to run for a given input size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    DynamicProgramming,
    Myers,
}

impl Algorithm {
    /// The quadratic aligner below `threshold` total elements, Myers at or above it
    pub fn for_input_size(total_len: usize, threshold: usize) -> Self {
        if total_len < threshold {
            Self::DynamicProgramming
        } else {
            Self::Myers
        }
    }

    /// Run the selected aligner.
    ///
    /// `equality_score` only affects the dynamic programming aligner; Myers
    /// works on plain equality.
    pub fn compute<S1, S2>(
        self,
        seq1: &S1,
        seq2: &S2,
        deadline: &Deadline,
        equality_score: Option<EqualityScore<'_>>,
    ) -> AlgorithmResult
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized,
    {
        match (self, equality_score) {
            (Self::DynamicProgramming, Some(score)) => {
                DynamicProgrammingDiffing.compute_with_score(seq1, seq2, deadline, score)
            }
            (Self::DynamicProgramming, None) => {
                DynamicProgrammingDiffing.compute(seq1, seq2, deadline)
            }
            (Self::Myers, _) => MyersDiffAlgorithm.compute(seq1, seq2, deadline),
        }
    }
}

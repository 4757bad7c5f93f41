//! Greedy O(N·D) aligner for large inputs
//!
//! Runs `similar`'s linear space Myers implementation over the element keys of
//! both sequences and converts its non-equal ops into [`SequenceDiff`]s.

use super::{AlgorithmResult, Deadline, DiffAlgorithm};
use crate::range::{OffsetRange, SequenceDiff};
use crate::sequence::Sequence;
use similar::algorithms::{myers, Capture, Replace};
use similar::{DiffOp, DiffTag};

/// The Myers aligner
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiffAlgorithm;

impl DiffAlgorithm for MyersDiffAlgorithm {
    fn compute<S1, S2>(&self, seq1: &S1, seq2: &S2, deadline: &Deadline) -> AlgorithmResult
    where
        S1: Sequence + ?Sized,
        S2: Sequence + ?Sized,
    {
        let old = elements(seq1);
        let new = elements(seq2);

        let mut hook = Replace::new(Capture::new());
        if let Err(never) = myers::diff_deadline(
            &mut hook,
            &old,
            0..old.len(),
            &new,
            0..new.len(),
            deadline.instant(),
        ) {
            match never {}
        }

        let diffs = hook
            .into_inner()
            .into_ops()
            .iter()
            .filter_map(to_sequence_diff)
            .collect();

        AlgorithmResult {
            diffs: merge_adjacent(diffs),
            // similar falls back to a coarse replace silently once the deadline passes
            hit_timeout: !deadline.is_valid(),
        }
    }
}

fn elements<S: Sequence + ?Sized>(seq: &S) -> Vec<u32> {
    (0..seq.len()).map(|offset| seq.element(offset)).collect()
}

fn to_sequence_diff(op: &DiffOp) -> Option<SequenceDiff> {
    if op.tag() == DiffTag::Equal {
        return None;
    }
    let (old, new) = (op.old_range(), op.new_range());
    if old.is_empty() && new.is_empty() {
        return None;
    }
    Some(SequenceDiff::new(
        OffsetRange::new(old.start, old.end),
        OffsetRange::new(new.start, new.end),
    ))
}

/// Join diffs that touch in both sequences
fn merge_adjacent(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    let mut merged: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match merged.last_mut() {
            Some(last)
                if last.seq1_range.end_exclusive == diff.seq1_range.start
                    && last.seq2_range.end_exclusive == diff.seq2_range.start =>
            {
                *last = last.join(diff);
            }
            _ => merged.push(diff),
        }
    }
    merged
}

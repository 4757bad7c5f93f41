//! Diff computation engine

use crate::algorithms::{
    optimize_sequence_diffs, smoothen_sequence_diffs, Algorithm, Deadline,
};
use crate::mapping::{line_range_mappings_from_range_mappings, LineRangeMapping, RangeMapping};
use crate::range::{LineRange, OffsetRange, SequenceDiff, TextRange};
use crate::sequence::{CharSlice, LineInterner, LineSequence, Sequence};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Below this many lines in total (both documents), lines are aligned with the
/// dynamic programming aligner; at or above it, with Myers.
pub const LINE_ALIGNMENT_THRESHOLD: usize = 1500;

/// Below this many characters in total, changed regions are refined with the
/// dynamic programming aligner; at or above it, with Myers.
pub const CHAR_ALIGNMENT_THRESHOLD: usize = 500;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
}

/// Knobs passed through to a diff computation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Don't report lines that only differ in leading or trailing whitespace
    pub ignore_trim_whitespace: bool,
    /// Time budget in milliseconds; `None` never gives up
    pub max_computation_time_ms: Option<u64>,
}

impl DiffOptions {
    pub fn max_computation_time(&self) -> Option<Duration> {
        self.max_computation_time_ms.map(Duration::from_millis)
    }
}

/// Result of a diff operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesDiff {
    /// The time budget ran out and `changes` is a best-effort result
    pub quit_early: bool,
    /// Changed line blocks, ordered and non-overlapping
    pub changes: Vec<LineRangeMapping>,
}

impl LinesDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats {
            changes: self.changes.len(),
            original_lines: self.changes.iter().map(|c| c.original_range.len()).sum(),
            modified_lines: self.changes.iter().map(|c| c.modified_range.len()).sum(),
        }
    }

    /// One block replacing everything, used when the line alignment gave up
    fn whole_document(original_len: usize, modified_len: usize) -> Self {
        let inner = RangeMapping::new(
            TextRange::new(1, 1, original_len + 1, 1),
            TextRange::new(1, 1, modified_len + 1, 1),
        );
        Self {
            quit_early: true,
            changes: vec![LineRangeMapping::new(
                LineRange::new(1, original_len + 1),
                LineRange::new(1, modified_len + 1),
                vec![inner],
            )],
        }
    }
}

/// Number of change blocks and the lines they cover on each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub changes: usize,
    pub original_lines: usize,
    pub modified_lines: usize,
}

/// A diff for a single pair of files
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub result: LinesDiff,
}

/// Compute the line and character level diff between two documents
pub fn compute_diff<S: AsRef<str>>(
    original_lines: &[S],
    modified_lines: &[S],
    options: &DiffOptions,
) -> LinesDiff {
    DiffEngine::with_options(options.clone()).compute_diff(original_lines, modified_lines)
}

/// The main diff engine
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    pub fn with_ignore_trim_whitespace(mut self, enabled: bool) -> Self {
        self.options.ignore_trim_whitespace = enabled;
        self
    }

    pub fn with_max_computation_time(mut self, budget: Option<Duration>) -> Self {
        self.options.max_computation_time_ms =
            budget.map(|b| u64::try_from(b.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compute the diff between two line arrays
    pub fn compute_diff<S: AsRef<str>>(
        &self,
        original_lines: &[S],
        modified_lines: &[S],
    ) -> LinesDiff {
        if lines_equal(original_lines, modified_lines) {
            return LinesDiff::default();
        }

        let deadline = Deadline::new(self.options.max_computation_time());
        let mut interner = LineInterner::new();
        let seq1 = LineSequence::new(original_lines, &mut interner);
        let seq2 = LineSequence::new(modified_lines, &mut interner);

        let algorithm = Algorithm::for_input_size(seq1.len() + seq2.len(), LINE_ALIGNMENT_THRESHOLD);
        debug!(
            original_lines = seq1.len(),
            modified_lines = seq2.len(),
            distinct_lines = interner.len(),
            ?algorithm,
            "aligning lines"
        );

        let equality_score: &dyn Fn(usize, usize) -> f64 = &|offset1, offset2| {
            line_equality_score(
                original_lines[offset1].as_ref(),
                modified_lines[offset2].as_ref(),
            )
        };
        let alignment = algorithm.compute(&seq1, &seq2, &deadline, Some(equality_score));
        if alignment.hit_timeout {
            warn!(
                budget_ms = ?self.options.max_computation_time_ms,
                "line alignment ran out of time"
            );
            return LinesDiff::whole_document(original_lines.len(), modified_lines.len());
        }

        let line_diffs = optimize_sequence_diffs(&seq1, &seq2, alignment.diffs);

        let refiner = Refiner {
            original_lines,
            modified_lines,
            deadline: &deadline,
            scan_whitespace: !self.options.ignore_trim_whitespace,
        };
        let mut alignments = Vec::new();
        let mut quit_early = false;

        let (seq1_last_start, seq2_last_start) =
            line_diffs
                .iter()
                .fold((0, 0), |(seq1_last_start, seq2_last_start), diff| {
                    debug_assert_eq!(
                        diff.seq1_range.start - seq1_last_start,
                        diff.seq2_range.start - seq2_last_start,
                        "line diffs must keep unchanged lines aligned"
                    );
                    let equal_lines_count = diff.seq1_range.start - seq1_last_start;
                    quit_early |= refiner.scan_for_whitespace_changes(
                        seq1_last_start,
                        seq2_last_start,
                        equal_lines_count,
                        &mut alignments,
                    );
                    quit_early |= refiner.refine_diff(diff, &mut alignments);
                    (diff.seq1_range.end_exclusive, diff.seq2_range.end_exclusive)
                });
        quit_early |= refiner.scan_for_whitespace_changes(
            seq1_last_start,
            seq2_last_start,
            original_lines.len() - seq1_last_start,
            &mut alignments,
        );

        let changes = line_range_mappings_from_range_mappings(alignments);
        if quit_early {
            warn!("character refinement ran out of time");
        }
        debug!(changes = changes.len(), quit_early, "diff computed");

        LinesDiff {
            quit_early,
            changes,
        }
    }

    /// Compute the diff between two texts, split on `\n`
    pub fn diff_strings(&self, old: &str, new: &str) -> LinesDiff {
        let old_lines = split_lines(old);
        let new_lines = split_lines(new);
        self.compute_diff(&old_lines, &new_lines)
    }

    /// Compute diff between two files
    pub fn diff_files(&self, old_path: &Path, new_path: &Path) -> Result<FileDiff, DiffError> {
        let old_content = std::fs::read_to_string(old_path)?;
        let new_content = std::fs::read_to_string(new_path)?;

        let result = self.diff_strings(&old_content, &new_content);

        Ok(FileDiff {
            old_path: Some(old_path.to_string_lossy().to_string()),
            new_path: Some(new_path.to_string_lossy().to_string()),
            result,
        })
    }
}

/// Split text into lines on `\n`; a `\r` before it stays part of the line
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Value of matching two lines whose trimmed text is equal.
///
/// Blank lines are cheap to match so they don't anchor the alignment, long
/// lines are strong evidence, and lines that only differ in whitespace still
/// match but for less.
fn line_equality_score(original: &str, modified: &str) -> f64 {
    if original != modified {
        0.99
    } else if modified.trim().is_empty() {
        0.1
    } else {
        1.0 + (1.0 + modified.chars().count() as f64).ln()
    }
}

fn lines_equal<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.as_ref() == y.as_ref())
}

/// Character level refinement of line level diffs
struct Refiner<'a, S> {
    original_lines: &'a [S],
    modified_lines: &'a [S],
    deadline: &'a Deadline,
    scan_whitespace: bool,
}

impl<S: AsRef<str>> Refiner<'_, S> {
    /// Lines that are equal after trimming may still differ in whitespace;
    /// refine each such pair in a run of `count` hash-equal lines.
    ///
    /// Returns whether the deadline expired.
    fn scan_for_whitespace_changes(
        &self,
        seq1_start: usize,
        seq2_start: usize,
        count: usize,
        alignments: &mut Vec<RangeMapping>,
    ) -> bool {
        if !self.scan_whitespace {
            return false;
        }
        let mut hit_timeout = false;
        for i in 0..count {
            let seq1_offset = seq1_start + i;
            let seq2_offset = seq2_start + i;
            if self.original_lines[seq1_offset].as_ref() != self.modified_lines[seq2_offset].as_ref() {
                let diff = SequenceDiff::new(
                    OffsetRange::new(seq1_offset, seq1_offset + 1),
                    OffsetRange::new(seq2_offset, seq2_offset + 1),
                );
                hit_timeout |= self.refine_diff(&diff, alignments);
            }
        }
        hit_timeout
    }

    /// Diff the characters of the lines covered by `diff` and append the
    /// resulting mappings in document coordinates.
    ///
    /// Returns whether the deadline expired.
    fn refine_diff(&self, diff: &SequenceDiff, alignments: &mut Vec<RangeMapping>) -> bool {
        let slice1 = CharSlice::new(self.original_lines, diff.seq1_range);
        let slice2 = CharSlice::new(self.modified_lines, diff.seq2_range);

        let algorithm =
            Algorithm::for_input_size(slice1.len() + slice2.len(), CHAR_ALIGNMENT_THRESHOLD);
        trace!(%diff, chars = slice1.len() + slice2.len(), ?algorithm, "refining line diff");

        let result = algorithm.compute(&slice1, &slice2, self.deadline, None);
        let diffs = optimize_sequence_diffs(&slice1, &slice2, result.diffs);
        let diffs = smoothen_sequence_diffs(diffs);

        alignments.extend(diffs.iter().map(|d| {
            RangeMapping::new(
                slice1
                    .translate_range(d.seq1_range)
                    .delta(diff.seq1_range.start),
                slice2
                    .translate_range(d.seq2_range)
                    .delta(diff.seq2_range.start),
            )
        }));
        result.hit_timeout
    }
}

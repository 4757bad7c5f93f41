//! Redline Core - Two-tier line and character diff engine
//!
//! Lines are aligned first, with a quadratic dynamic programming aligner for
//! small inputs and Myers' algorithm for large ones. Each changed line region
//! is then diffed again character by character. The result is a list of
//! changed line blocks, each carrying the exact character ranges that changed.
//!
//! ```
//! use redline_core::{DiffEngine, LineRange};
//!
//! let diff = DiffEngine::new().diff_strings("a\nb\nc", "a\nB\nc");
//! assert_eq!(diff.changes.len(), 1);
//! assert_eq!(diff.changes[0].original_range, LineRange::new(2, 3));
//! ```

pub mod algorithms;
pub mod diff;
pub mod mapping;
pub mod range;
pub mod sequence;

pub use algorithms::{Algorithm, AlgorithmResult, Deadline, DiffAlgorithm};
pub use diff::{
    compute_diff, split_lines, DiffEngine, DiffError, DiffOptions, DiffStats, FileDiff, LinesDiff,
    CHAR_ALIGNMENT_THRESHOLD, LINE_ALIGNMENT_THRESHOLD,
};
pub use mapping::{LineRangeMapping, RangeMapping};
pub use range::{LineRange, OffsetRange, Position, SequenceDiff, TextRange};
pub use sequence::{CharSlice, LineSequence, Sequence};

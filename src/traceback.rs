use std::fmt;

use log::debug;

use crate::gap_model::{Move, TieBreak};
use crate::gap_state::{Direction, GapStateMatrix};
use crate::matrix::{candidates_at, predecessor, ScoreMatrix};
use crate::scoring::{AlignmentStats, ScoreParams};
use crate::{AlignerError, Sequence};

pub const GAP: u8 = b'-';
pub const MATCH_MARKER: u8 = b'|';
pub const NO_MARKER: u8 = b' ';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracebackOperation {
    Match,
    Mismatch,
    /// Symbol of B against a gap in A (vertical move).
    Insertion,
    /// Symbol of A against a gap in B (horizontal move).
    Deletion,
}

impl TracebackOperation {
    pub fn is_gap(self) -> bool {
        matches!(self, Self::Insertion | Self::Deletion)
    }

    fn gap_direction(self) -> Option<Direction> {
        match self {
            Self::Insertion => Some(Direction::Vertical),
            Self::Deletion => Some(Direction::Horizontal),
            Self::Match | Self::Mismatch => None,
        }
    }
}

/// Aligned A, marker line and aligned B, all the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentTrace {
    pub aligned_a: String,
    pub markers: String,
    pub aligned_b: String,
    pub operations: Vec<TracebackOperation>,
}

impl AlignmentTrace {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.markers.bytes().filter(|&m| m == MATCH_MARKER).count()
    }

    pub fn stats(&self) -> AlignmentStats {
        let mut stats = AlignmentStats::default();
        let mut prev = None;
        for &op in &self.operations {
            match op {
                TracebackOperation::Match => stats.matches += 1,
                TracebackOperation::Mismatch => stats.mismatches += 1,
                TracebackOperation::Insertion | TracebackOperation::Deletion => {
                    stats.gaps += 1;
                    if prev != Some(op) {
                        stats.gap_opens += 1;
                    }
                }
            }
            prev = Some(op);
        }
        stats
    }
}

impl fmt::Display for AlignmentTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.aligned_a)?;
        writeln!(f, "{}", self.markers)?;
        write!(f, "{}", self.aligned_b)
    }
}

/// Accumulates alignment columns from the end of the alignment backwards.
#[derive(Debug, Default)]
pub(crate) struct TraceBuilder {
    aligned_a: Vec<u8>,
    markers: Vec<u8>,
    aligned_b: Vec<u8>,
    operations: Vec<TracebackOperation>,
}

impl TraceBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            aligned_a: Vec::with_capacity(capacity),
            markers: Vec::with_capacity(capacity),
            aligned_b: Vec::with_capacity(capacity),
            operations: Vec::with_capacity(capacity),
        }
    }

    pub fn pair(&mut self, a: u8, b: u8) {
        let (marker, op) = if a == b {
            (MATCH_MARKER, TracebackOperation::Match)
        } else {
            (NO_MARKER, TracebackOperation::Mismatch)
        };
        self.push(a, marker, b, op);
    }

    pub fn gap_in_a(&mut self, b: u8) {
        self.push(GAP, NO_MARKER, b, TracebackOperation::Insertion);
    }

    pub fn gap_in_b(&mut self, a: u8) {
        self.push(a, NO_MARKER, GAP, TracebackOperation::Deletion);
    }

    /// Emit the column for `mv` ending at (`i`, `j`).
    pub fn step(&mut self, mv: Move, a: &[u8], b: &[u8], i: usize, j: usize) {
        match mv {
            Move::Diagonal => self.pair(a[j - 1], b[i - 1]),
            Move::Vertical => self.gap_in_a(b[i - 1]),
            Move::Horizontal => self.gap_in_b(a[j - 1]),
        }
    }

    /// Consume whatever prefix is left once a matrix edge is reached.
    pub fn flush(&mut self, a: &[u8], b: &[u8], mut i: usize, mut j: usize) {
        while j > 0 {
            self.gap_in_b(a[j - 1]);
            j -= 1;
        }
        while i > 0 {
            self.gap_in_a(b[i - 1]);
            i -= 1;
        }
    }

    fn push(&mut self, a: u8, marker: u8, b: u8, op: TracebackOperation) {
        self.aligned_a.push(a);
        self.markers.push(marker);
        self.aligned_b.push(b);
        self.operations.push(op);
    }

    pub fn finish(mut self) -> AlignmentTrace {
        self.aligned_a.reverse();
        self.markers.reverse();
        self.aligned_b.reverse();
        self.operations.reverse();

        AlignmentTrace {
            aligned_a: String::from_utf8_lossy(&self.aligned_a).into_owned(),
            markers: String::from_utf8_lossy(&self.markers).into_owned(),
            aligned_b: String::from_utf8_lossy(&self.aligned_b).into_owned(),
            operations: self.operations,
        }
    }
}

/// Reconstructs one optimal alignment from a filled neighbor-state matrix.
#[derive(Debug, Clone, Copy)]
pub struct Backtracker<'p> {
    params: &'p ScoreParams,
    tie_break: TieBreak,
}

impl<'p> Backtracker<'p> {
    pub fn new(params: &'p ScoreParams, tie_break: TieBreak) -> Self {
        Self { params, tie_break }
    }

    /// Walk from the bottom-right cell back to the origin.
    ///
    /// The matrices must be the ones filled for `a` and `b` with the same
    /// parameters and tie-break order. Returns the terminal score and trace.
    pub fn backtrack(
        &self,
        scores: &ScoreMatrix,
        gap_states: &GapStateMatrix,
        a: &Sequence,
        b: &Sequence,
    ) -> Result<(i32, AlignmentTrace), AlignerError> {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        let expected = (b.len() + 1, a.len() + 1);
        for actual in [scores.dims(), gap_states.dims()] {
            if actual != expected {
                return Err(AlignerError::DimensionMismatch { expected, actual });
            }
        }

        let (mut i, mut j) = (b.len(), a.len());
        let mut trace = TraceBuilder::with_capacity(a.len() + b.len());

        while i > 0 && j > 0 {
            let current = scores.get(i, j);
            let candidates = candidates_at(self.params, a, b, scores, gap_states, i, j);
            let mv = self
                .tie_break
                .find(&candidates, current)
                .ok_or(AlignerError::InconsistentMatrix { row: i, col: j })?;
            trace.step(mv, a, b, i, j);
            (i, j) = predecessor(mv, i, j);
        }
        trace.flush(a, b, i, j);

        let score = scores.final_score();
        debug!("Backtracked alignment with score {score}");
        Ok((score, trace.finish()))
    }
}

/// Re-derive the score of `trace` by charging every gap column against the
/// recorded state of the cell it leaves.
///
/// For a trace produced by [`Backtracker`] this equals the terminal cell.
pub fn rescore_with_states(
    trace: &AlignmentTrace,
    gap_states: &GapStateMatrix,
    params: &ScoreParams,
) -> Result<i32, AlignerError> {
    let (a, b) = (trace.aligned_a.as_bytes(), trace.aligned_b.as_bytes());
    let (mut i, mut j) = (0, 0);
    let mut score = 0;

    for (k, op) in trace.operations.iter().enumerate() {
        if i >= gap_states.rows() || j >= gap_states.cols() {
            return Err(AlignerError::InvalidInput(format!(
                "trace leaves the {}x{} matrix at column {k}",
                gap_states.rows(),
                gap_states.cols()
            )));
        }
        score += match op.gap_direction() {
            None => params.match_score(a[k], b[k]),
            Some(direction) => params.gap_cost(gap_states, i, j, direction),
        };
        match op {
            TracebackOperation::Match | TracebackOperation::Mismatch => {
                i += 1;
                j += 1;
            }
            TracebackOperation::Insertion => i += 1,
            TracebackOperation::Deletion => j += 1,
        }
    }
    Ok(score)
}

/// Re-derive the score of `trace` from its own gap runs: the first column of
/// a run costs the opening penalty, each following column the extension.
pub fn rescore_affine(trace: &AlignmentTrace, params: &ScoreParams) -> i32 {
    let (a, b) = (trace.aligned_a.as_bytes(), trace.aligned_b.as_bytes());
    let mut prev = None;
    let mut score = 0;
    for (k, &op) in trace.operations.iter().enumerate() {
        score += if op.is_gap() {
            if prev == Some(op) {
                params.gap_ext
            } else {
                params.gap_open
            }
        } else {
            params.match_score(a[k], b[k])
        };
        prev = Some(op);
    }
    score
}

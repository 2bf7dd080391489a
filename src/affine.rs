//! Needleman-Wunsch with affine gaps over three parallel matrices (Gotoh).
//!
//! `diag` holds the best score of alignments ending in a match/mismatch
//! column, `vert` those ending in a gap in A, `horiz` those ending in a gap
//! in B. A gap run of length `L` costs `gap_open + (L - 1) * gap_ext`.

use log::{debug, trace};

use crate::gap_model::{Candidates, Move, TieBreak};
use crate::matrix::{check_non_empty, ScoreMatrix};
use crate::scoring::ScoreParams;
use crate::traceback::{AlignmentTrace, TraceBuilder};
use crate::{AlignerError, Sequence};

/// Unreachable state.
///
/// Its magnitude exceeds twice [`crate::scoring::SCORE_LIMIT`], so once
/// [`ScoreParams::check_range`] passes every value derived from it stays
/// below every reachable score.
pub const NEG_INF: i32 = i32::MIN / 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffineMatrices {
    pub diag: ScoreMatrix,
    pub vert: ScoreMatrix,
    pub horiz: ScoreMatrix,
}

impl AffineMatrices {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            diag: ScoreMatrix::filled(rows, cols, NEG_INF),
            vert: ScoreMatrix::filled(rows, cols, NEG_INF),
            horiz: ScoreMatrix::filled(rows, cols, NEG_INF),
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        self.diag.dims()
    }

    /// Per-state scores at (`i`, `j`).
    pub fn states(&self, i: usize, j: usize) -> Candidates {
        Candidates {
            diagonal: self.diag.get(i, j),
            vertical: self.vert.get(i, j),
            horizontal: self.horiz.get(i, j),
        }
    }

    /// Best overall score at every cell.
    pub fn best(&self) -> ScoreMatrix {
        let (rows, cols) = self.dims();
        let mut best = ScoreMatrix::new(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                best.set(i, j, self.states(i, j).max());
            }
        }
        best
    }

    pub fn final_score(&self) -> i32 {
        let (rows, cols) = self.dims();
        self.states(rows - 1, cols - 1).max()
    }
}

/// Candidates for entering `vert(i, j)` from each state of (i-1, j).
fn vertical_sources(m: &AffineMatrices, params: &ScoreParams, i: usize, j: usize) -> Candidates {
    Candidates {
        diagonal: m.diag.get(i - 1, j).saturating_add(params.gap_open),
        vertical: m.vert.get(i - 1, j).saturating_add(params.gap_ext),
        horizontal: m.horiz.get(i - 1, j).saturating_add(params.gap_open),
    }
}

/// Candidates for entering `horiz(i, j)` from each state of (i, j-1).
fn horizontal_sources(m: &AffineMatrices, params: &ScoreParams, i: usize, j: usize) -> Candidates {
    Candidates {
        diagonal: m.diag.get(i, j - 1).saturating_add(params.gap_open),
        vertical: m.vert.get(i, j - 1).saturating_add(params.gap_open),
        horizontal: m.horiz.get(i, j - 1).saturating_add(params.gap_ext),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AffineAligner<'p> {
    params: &'p ScoreParams,
    tie_break: TieBreak,
}

impl<'p> AffineAligner<'p> {
    pub fn new(params: &'p ScoreParams, tie_break: TieBreak) -> Self {
        Self { params, tie_break }
    }

    /// Fill the three matrices for `a` (columns) against `b` (rows).
    pub fn build(&self, a: &Sequence, b: &Sequence) -> Result<AffineMatrices, AlignerError> {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        check_non_empty(a, b)?;
        self.params.check_range(a.len(), b.len())?;
        let (rows, cols) = (b.len() + 1, a.len() + 1);
        debug!("Filling three {rows}x{cols} affine matrices");

        let mut m = AffineMatrices::new(rows, cols);
        m.diag.set(0, 0, 0);
        for i in 1..rows {
            let v = if i == 1 {
                self.params.gap_open
            } else {
                m.vert.get(i - 1, 0).saturating_add(self.params.gap_ext)
            };
            m.vert.set(i, 0, v);
        }
        for j in 1..cols {
            let h = if j == 1 {
                self.params.gap_open
            } else {
                m.horiz.get(0, j - 1).saturating_add(self.params.gap_ext)
            };
            m.horiz.set(0, j, h);
        }

        for i in 1..rows {
            for j in 1..cols {
                let (_, prev_best) = self.tie_break.pick(&m.states(i - 1, j - 1));
                let diag = prev_best.saturating_add(self.params.match_score(a[j - 1], b[i - 1]));
                let (_, vert) = self.tie_break.pick(&vertical_sources(&m, self.params, i, j));
                m.diag.set(i, j, diag);
                m.vert.set(i, j, vert);
                let (_, horiz) = self.tie_break.pick(&horizontal_sources(&m, self.params, i, j));
                m.horiz.set(i, j, horiz);
                trace!("cell ({i}, {j}) = diag {diag}, vert {vert}, horiz {horiz}");
            }
        }
        Ok(m)
    }

    /// Follow the state that produced each value from the bottom-right cell.
    pub fn backtrack(
        &self,
        m: &AffineMatrices,
        a: &Sequence,
        b: &Sequence,
    ) -> Result<(i32, AlignmentTrace), AlignerError> {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        let expected = (b.len() + 1, a.len() + 1);
        if m.dims() != expected {
            return Err(AlignerError::DimensionMismatch {
                expected,
                actual: m.dims(),
            });
        }

        let (mut i, mut j) = (b.len(), a.len());
        let (mut state, score) = self.tie_break.pick(&m.states(i, j));
        let mut trace = TraceBuilder::with_capacity(a.len() + b.len());

        while i > 0 && j > 0 {
            let inconsistent = AlignerError::InconsistentMatrix { row: i, col: j };
            match state {
                Move::Diagonal => {
                    let (prev, prev_best) = self.tie_break.pick(&m.states(i - 1, j - 1));
                    let pair = self.params.match_score(a[j - 1], b[i - 1]);
                    if m.diag.get(i, j) != prev_best.saturating_add(pair) {
                        return Err(inconsistent);
                    }
                    trace.pair(a[j - 1], b[i - 1]);
                    state = prev;
                    i -= 1;
                    j -= 1;
                }
                Move::Vertical => {
                    let sources = vertical_sources(m, self.params, i, j);
                    state = self
                        .tie_break
                        .find(&sources, m.vert.get(i, j))
                        .ok_or(inconsistent)?;
                    trace.gap_in_a(b[i - 1]);
                    i -= 1;
                }
                Move::Horizontal => {
                    let sources = horizontal_sources(m, self.params, i, j);
                    state = self
                        .tie_break
                        .find(&sources, m.horiz.get(i, j))
                        .ok_or(inconsistent)?;
                    trace.gap_in_b(a[j - 1]);
                    j -= 1;
                }
            }
        }
        trace.flush(a, b, i, j);

        debug!("Backtracked affine alignment with score {score}");
        Ok((score, trace.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SCORE_LIMIT;
    use crate::traceback::rescore_affine;

    fn seq(s: &str) -> Sequence {
        Sequence::try_from(s).unwrap()
    }

    fn align(params: &ScoreParams, a: &str, b: &str) -> (i32, AlignmentTrace) {
        let aligner = AffineAligner::new(params, TieBreak::default());
        let (a, b) = (seq(a), seq(b));
        let m = aligner.build(&a, &b).unwrap();
        let (score, trace) = aligner.backtrack(&m, &a, &b).unwrap();
        assert_eq!(score, m.final_score());
        (score, trace)
    }

    #[test]
    fn test_boundaries() {
        let params = ScoreParams::new(20, -10, -8, -3);
        let m = AffineAligner::new(&params, TieBreak::default())
            .build(&seq("ACG"), &seq("AC"))
            .unwrap();
        let best = m.best();
        assert_eq!(best.row(0), [0, -8, -11, -14]);
        assert_eq!(best.get(1, 0), -8);
        assert_eq!(best.get(2, 0), -11);
        assert_eq!(m.diag.get(0, 2), NEG_INF);
        assert_eq!(m.vert.get(0, 2), NEG_INF);
    }

    #[test]
    fn test_ac_ag() {
        let params = ScoreParams::default();
        let (score, trace) = align(&params, "AC", "AG");
        assert_eq!(score, 10);
        assert_eq!(trace.to_string(), "AC\n| \nAG");
    }

    #[test]
    fn test_single_long_gap_preferred() {
        // One run of three is cheaper than splitting the gap.
        let params = ScoreParams::new(10, -20, -15, -1);
        let (score, trace) = align(&params, "ACGTTTAC", "ACGAC");
        assert_eq!(score, 5 * 10 - 15 - 2);
        assert_eq!(trace.aligned_a, "ACGTTTAC");
        assert_eq!(trace.aligned_b.replace('-', ""), "ACGAC");
        assert_eq!(trace.stats().gap_opens, 1);
        assert_eq!(rescore_affine(&trace, &params), score);
    }

    #[test]
    fn test_gap_switch_reopens() {
        let params = ScoreParams::new(10, -100, -3, -1);
        let (score, trace) = align(&params, "AC", "AG");
        // A-C / AG- style: match, then one gap of each kind.
        assert_eq!(score, 10 - 3 - 3);
        assert_eq!(trace.len(), 3);
        assert_eq!(rescore_affine(&trace, &params), score);
    }

    #[test]
    fn test_corrupted_matrix_detected() {
        let params = ScoreParams::default();
        let aligner = AffineAligner::new(&params, TieBreak::default());
        let (a, b) = (seq("ACGT"), seq("AGT"));
        let mut m = aligner.build(&a, &b).unwrap();
        // Force the terminal state to a gap value no source can produce.
        m.vert.set(3, 4, 1_000);
        let err = aligner.backtrack(&m, &a, &b).unwrap_err();
        assert!(matches!(err, AlignerError::InconsistentMatrix { row: 3, col: 4 }));
    }

    #[test]
    fn test_huge_gap_open_beats_unreachable_states() {
        // Scores far below NEG_INF / 2 must still win over unreachable states.
        let gap_open = -(SCORE_LIMIT as i32 / 3);
        let params = ScoreParams::new(20, -10, gap_open, -1);
        let (score, trace) = align(&params, "A", "AA");
        assert_eq!(score, 20 + gap_open);
        assert_eq!(trace.aligned_a.replace('-', ""), "A");
        assert_eq!(rescore_affine(&trace, &params), score);

        let mismatch = -(SCORE_LIMIT as i32 / 8);
        let params = ScoreParams::new(1, mismatch, mismatch, mismatch);
        let (score, _) = align(&params, "AAAA", "CCCC");
        assert_eq!(score, 4 * mismatch);
    }

    #[test]
    fn test_out_of_range_penalties_rejected() {
        let params = ScoreParams::new(20, -10, -1_000_000_000, -1);
        let aligner = AffineAligner::new(&params, TieBreak::default());
        let err = aligner.build(&seq("A"), &seq("AA")).unwrap_err();
        assert!(matches!(err, AlignerError::InvalidInput(_)));
    }
}

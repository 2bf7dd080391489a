//! Score matrix construction for the neighbor-state gap model.
//!
//! Rows follow sequence B and columns follow sequence A, so cell (i, j) scores
//! the first `j` symbols of A against the first `i` symbols of B.

use std::fmt;

use log::{debug, trace};

use crate::gap_model::{Candidates, Move, TieBreak};
use crate::gap_state::{Direction, GapState, GapStateMatrix};
use crate::scoring::ScoreParams;
use crate::{AlignerError, Sequence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    data: Vec<i32>,
    rows: usize,
    cols: usize,
}

impl ScoreMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols],
            rows,
            cols,
        }
    }

    pub(crate) fn filled(rows: usize, cols: usize, value: i32) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    /// Value of the bottom-right cell.
    pub fn final_score(&self) -> i32 {
        self.get(self.rows - 1, self.cols - 1)
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

impl fmt::Display for ScoreMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for value in self.row(row) {
                write!(f, "{value:>5}")?;
            }
            writeln!(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fills a [`ScoreMatrix`] and its [`GapStateMatrix`] for one pair of sequences.
#[derive(Debug, Clone, Copy)]
pub struct MatrixBuilder<'p> {
    params: &'p ScoreParams,
    tie_break: TieBreak,
}

impl<'p> MatrixBuilder<'p> {
    pub fn new(params: &'p ScoreParams, tie_break: TieBreak) -> Self {
        Self { params, tie_break }
    }

    /// Allocate and fill both matrices for `a` (columns) against `b` (rows).
    pub fn build(
        &self,
        a: &Sequence,
        b: &Sequence,
    ) -> Result<(ScoreMatrix, GapStateMatrix), AlignerError> {
        check_non_empty(a.as_bytes(), b.as_bytes())?;
        let (rows, cols) = (b.len() + 1, a.len() + 1);
        let mut scores = ScoreMatrix::new(rows, cols);
        let mut gap_states = GapStateMatrix::new(rows, cols);
        self.fill_into(a, b, &mut scores, &mut gap_states)?;
        Ok((scores, gap_states))
    }

    /// Fill caller-owned matrices, which must be `(len(b)+1) x (len(a)+1)`.
    ///
    /// Nothing is written unless both inputs are valid and every score fits
    /// within [`crate::scoring::SCORE_LIMIT`].
    pub fn fill_into(
        &self,
        a: &Sequence,
        b: &Sequence,
        scores: &mut ScoreMatrix,
        gap_states: &mut GapStateMatrix,
    ) -> Result<(), AlignerError> {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        check_non_empty(a, b)?;
        self.params.check_range(a.len(), b.len())?;
        let expected = (b.len() + 1, a.len() + 1);
        for actual in [scores.dims(), gap_states.dims()] {
            if actual != expected {
                return Err(AlignerError::DimensionMismatch { expected, actual });
            }
        }
        debug!(
            "Filling {}x{} score matrix ({} cells)",
            expected.0,
            expected.1,
            expected.0 * expected.1
        );

        self.init_boundaries(scores, gap_states);
        self.fill_interior(a, b, scores, gap_states);
        Ok(())
    }

    fn init_boundaries(&self, scores: &mut ScoreMatrix, gap_states: &mut GapStateMatrix) {
        gap_states.reset();
        scores.set(0, 0, 0);

        for i in 1..scores.rows() {
            let cost = self.params.gap_cost(gap_states, i - 1, 0, Direction::Vertical);
            scores.set(i, 0, scores.get(i - 1, 0).saturating_add(cost));
            gap_states.set(i, 0, GapState::gap(Direction::Vertical));
        }
        for j in 1..scores.cols() {
            let cost = self.params.gap_cost(gap_states, 0, j - 1, Direction::Horizontal);
            scores.set(0, j, scores.get(0, j - 1).saturating_add(cost));
            gap_states.set(0, j, GapState::gap(Direction::Horizontal));
        }
    }

    fn fill_interior(
        &self,
        a: &[u8],
        b: &[u8],
        scores: &mut ScoreMatrix,
        gap_states: &mut GapStateMatrix,
    ) {
        for i in 1..scores.rows() {
            for j in 1..scores.cols() {
                let candidates = candidates_at(self.params, a, b, scores, gap_states, i, j);
                let (winner, best) = self.tie_break.pick(&candidates);
                scores.set(i, j, best);
                if let Some(direction) = winner.gap_direction() {
                    gap_states.set(i, j, GapState::gap(direction));
                }
                trace!("cell ({i}, {j}) = {best} via {winner:?}");
            }
        }
    }
}

/// Scores reachable at (`i`, `j`) through each of its three predecessors.
///
/// Shared by the fill and the traceback so both evaluate identical costs.
pub(crate) fn candidates_at(
    params: &ScoreParams,
    a: &[u8],
    b: &[u8],
    scores: &ScoreMatrix,
    gap_states: &GapStateMatrix,
    i: usize,
    j: usize,
) -> Candidates {
    Candidates {
        diagonal: scores
            .get(i - 1, j - 1)
            .saturating_add(params.match_score(a[j - 1], b[i - 1])),
        vertical: scores
            .get(i - 1, j)
            .saturating_add(params.gap_cost(gap_states, i - 1, j, Direction::Vertical)),
        horizontal: scores
            .get(i, j - 1)
            .saturating_add(params.gap_cost(gap_states, i, j - 1, Direction::Horizontal)),
    }
}

/// Source cell of `mv` when it ends at (`i`, `j`).
pub(crate) fn predecessor(mv: Move, i: usize, j: usize) -> (usize, usize) {
    match mv {
        Move::Diagonal => (i - 1, j - 1),
        Move::Vertical => (i - 1, j),
        Move::Horizontal => (i, j - 1),
    }
}

pub(crate) fn check_non_empty(a: &[u8], b: &[u8]) -> Result<(), AlignerError> {
    if a.is_empty() || b.is_empty() {
        return Err(AlignerError::InvalidInput(format!(
            "cannot build a score matrix for empty sequences (len(A) = {}, len(B) = {})",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

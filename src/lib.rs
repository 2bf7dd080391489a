use std::time::Instant;

use log::{debug, info};
use thiserror::Error;

pub mod affine;
pub mod config;
pub mod gap_model;
pub mod gap_state;
pub mod input;
pub mod matrix;
pub mod scoring;
pub mod traceback;

pub use affine::{AffineAligner, AffineMatrices};
pub use config::AlignConfig;
pub use gap_model::{GapModel, Move, TieBreak};
pub use gap_state::{Direction, GapState, GapStateMatrix};
pub use matrix::{MatrixBuilder, ScoreMatrix};
pub use scoring::{AlignmentStats, ScoreParams};
pub use traceback::{AlignmentTrace, Backtracker, TracebackOperation};

use traceback::{TraceBuilder, GAP};

// Default scoring parameters
pub const DEFAULT_MATCH: i32 = 20;
pub const DEFAULT_MISMATCH: i32 = -10;
pub const DEFAULT_GAP_OPEN: i32 = -5;
pub const DEFAULT_GAP_EXT: i32 = -5;

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Matrix is {actual:?} (rows x cols), expected {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("No valid predecessor for cell ({row}, {col}); score matrix disagrees with its gap states")]
    InconsistentMatrix { row: usize, col: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An input sequence. Any printable, non-whitespace ASCII except `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    data: Vec<u8>,
}

impl Sequence {
    pub fn new(data: &[u8]) -> Result<Self, AlignerError> {
        if let Some(pos) = data.iter().position(|&c| !c.is_ascii_graphic() || c == GAP) {
            return Err(AlignerError::InvalidInput(format!(
                "unsupported symbol {:?} at position {pos}",
                data[pos] as char
            )));
        }
        Ok(Self {
            data: data.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl TryFrom<&str> for Sequence {
    type Error = AlignerError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s.as_bytes())
    }
}

#[derive(Debug, Clone)]
pub struct AlignmentResult {
    pub score: i32,
    pub trace: AlignmentTrace,
    pub statistics: AlignmentStats,
    /// Best score per cell, kept for inspection.
    pub score_matrix: ScoreMatrix,
}

/// Global aligner: builds the score matrices, then backtracks one optimal path.
#[derive(Debug, Clone, Default)]
pub struct Aligner {
    config: AlignConfig,
}

impl Aligner {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    pub fn align_str(&self, a: &str, b: &str) -> Result<AlignmentResult, AlignerError> {
        self.align(&Sequence::try_from(a)?, &Sequence::try_from(b)?)
    }

    /// Align `a` against `b` end to end.
    ///
    /// When exactly one side is empty the result is a single gap run over
    /// the other side.
    pub fn align(&self, a: &Sequence, b: &Sequence) -> Result<AlignmentResult, AlignerError> {
        let start_time = Instant::now();
        debug!(
            "Aligning {} x {} symbols with {:?}",
            a.len(),
            b.len(),
            self.config.gap_model
        );
        self.config.scoring.check_range(a.len(), b.len())?;

        let (score, trace, score_matrix) = if a.is_empty() || b.is_empty() {
            self.align_against_empty(a.as_bytes(), b.as_bytes())?
        } else {
            match self.config.gap_model {
                GapModel::NeighborState => self.align_neighbor_state(a, b)?,
                GapModel::ThreeMatrix => self.align_three_matrix(a, b)?,
            }
        };

        let statistics = AlignmentStats {
            execution_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
            ..trace.stats()
        };
        info!(
            "Alignment score {score} ({} matches, {} mismatches, {} gaps)",
            statistics.matches, statistics.mismatches, statistics.gaps
        );

        Ok(AlignmentResult {
            score,
            trace,
            statistics,
            score_matrix,
        })
    }

    fn align_neighbor_state(
        &self,
        a: &Sequence,
        b: &Sequence,
    ) -> Result<(i32, AlignmentTrace, ScoreMatrix), AlignerError> {
        let params = &self.config.scoring;
        let (scores, gap_states) = MatrixBuilder::new(params, self.config.tie_break).build(a, b)?;
        let (score, trace) =
            Backtracker::new(params, self.config.tie_break).backtrack(&scores, &gap_states, a, b)?;
        Ok((score, trace, scores))
    }

    fn align_three_matrix(
        &self,
        a: &Sequence,
        b: &Sequence,
    ) -> Result<(i32, AlignmentTrace, ScoreMatrix), AlignerError> {
        let aligner = AffineAligner::new(&self.config.scoring, self.config.tie_break);
        let matrices = aligner.build(a, b)?;
        let (score, trace) = aligner.backtrack(&matrices, a, b)?;
        Ok((score, trace, matrices.best()))
    }

    fn align_against_empty(
        &self,
        a: &[u8],
        b: &[u8],
    ) -> Result<(i32, AlignmentTrace, ScoreMatrix), AlignerError> {
        if a.is_empty() && b.is_empty() {
            return Err(AlignerError::InvalidInput(
                "both sequences are empty".to_string(),
            ));
        }

        let params = &self.config.scoring;
        let (rows, cols) = (b.len() + 1, a.len() + 1);
        let mut scores = ScoreMatrix::new(rows, cols);
        for k in 1..rows.max(cols) {
            let cost = params.gap_run_cost(k);
            if rows > 1 {
                scores.set(k, 0, cost);
            } else {
                scores.set(0, k, cost);
            }
        }

        let mut trace = TraceBuilder::with_capacity(a.len() + b.len());
        trace.flush(a, b, b.len(), a.len());
        Ok((scores.final_score(), trace.finish(), scores))
    }
}

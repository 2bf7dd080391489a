use serde::{Deserialize, Serialize};

use crate::gap_state::{Direction, GapStateMatrix};
use crate::{AlignerError, DEFAULT_GAP_EXT, DEFAULT_GAP_OPEN, DEFAULT_MATCH, DEFAULT_MISMATCH};

/// Largest score magnitude any alignment may reach.
///
/// Every reachable score then stays strictly above the values derived from
/// [`crate::affine::NEG_INF`], and no cell arithmetic can leave `i32`.
pub const SCORE_LIMIT: i64 = (i32::MAX / 8) as i64;

/// Match, mismatch and gap costs for one alignment run.
///
/// Every value is added to the running score, so penalties are normally
/// negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    pub match_score: i32,
    pub mismatch: i32,
    pub gap_open: i32,
    pub gap_ext: i32,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            match_score: DEFAULT_MATCH,
            mismatch: DEFAULT_MISMATCH,
            gap_open: DEFAULT_GAP_OPEN,
            gap_ext: DEFAULT_GAP_EXT,
        }
    }
}

impl ScoreParams {
    pub fn new(match_score: i32, mismatch: i32, gap_open: i32, gap_ext: i32) -> Self {
        Self {
            match_score,
            mismatch,
            gap_open,
            gap_ext,
        }
    }

    /// Fail unless every alignment of `a_len` against `b_len` symbols scores
    /// within [`SCORE_LIMIT`].
    ///
    /// An alignment has at most `a_len + b_len` columns and each column adds
    /// one parameter, so the largest parameter magnitude bounds the rest.
    pub fn check_range(&self, a_len: usize, b_len: usize) -> Result<(), AlignerError> {
        let widest = [self.match_score, self.mismatch, self.gap_open, self.gap_ext]
            .into_iter()
            .map(|v| i64::from(v).abs())
            .fold(0, i64::max);
        let columns = i64::try_from(a_len.saturating_add(b_len)).unwrap_or(i64::MAX);
        if columns.saturating_mul(widest) > SCORE_LIMIT {
            return Err(AlignerError::InvalidInput(format!(
                "score parameters up to {widest} over {columns} columns exceed the supported magnitude {SCORE_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Score for placing `a` against `b` in the same column.
    #[inline]
    pub fn match_score(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch
        }
    }

    /// Cost of a gap move in `direction` leaving the cell at (`row`, `col`).
    ///
    /// The move extends a gap only when the source cell was itself reached by
    /// a gap move in the same direction; anything else opens a new gap.
    #[inline]
    pub fn gap_cost(
        &self,
        gap_states: &GapStateMatrix,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> i32 {
        if gap_states.get(row, col).extends(direction) {
            self.gap_ext
        } else {
            self.gap_open
        }
    }

    /// Total cost of a single gap run of `len` columns.
    pub fn gap_run_cost(&self, len: usize) -> i32 {
        match len {
            0 => 0,
            n => self.gap_open + (n as i32 - 1) * self.gap_ext,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentStats {
    pub matches: u32,
    pub mismatches: u32,
    pub gaps: u32,
    pub gap_opens: u32,
    pub execution_time_ms: f32,
}

impl AlignmentStats {
    /// Fraction of alignment columns that are exact matches.
    pub fn identity(&self) -> f32 {
        let columns = self.matches + self.mismatches + self.gaps;
        if columns == 0 {
            0.0
        } else {
            self.matches as f32 / columns as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap_state::GapState;

    #[test]
    fn test_match_score() {
        let params = ScoreParams::default();
        assert_eq!(params.match_score(b'A', b'A'), 20);
        assert_eq!(params.match_score(b'A', b'C'), -10);
        // Case is not normalized.
        assert_eq!(params.match_score(b'a', b'A'), -10);
    }

    #[test]
    fn test_gap_cost_open_vs_extend() {
        let params = ScoreParams::new(1, -1, -10, -2);
        let mut states = GapStateMatrix::new(2, 2);
        states.set(0, 1, GapState::gap(Direction::Horizontal));
        states.set(1, 0, GapState::gap(Direction::Vertical));

        // Unset cell always opens.
        assert_eq!(params.gap_cost(&states, 0, 0, Direction::Vertical), -10);
        assert_eq!(params.gap_cost(&states, 0, 0, Direction::Horizontal), -10);
        // Same direction extends, the other direction opens.
        assert_eq!(params.gap_cost(&states, 0, 1, Direction::Horizontal), -2);
        assert_eq!(params.gap_cost(&states, 0, 1, Direction::Vertical), -10);
        assert_eq!(params.gap_cost(&states, 1, 0, Direction::Vertical), -2);
        assert_eq!(params.gap_cost(&states, 1, 0, Direction::Horizontal), -10);
    }

    #[test]
    fn test_gap_run_cost() {
        let params = ScoreParams::new(1, -1, -10, -2);
        assert_eq!(params.gap_run_cost(0), 0);
        assert_eq!(params.gap_run_cost(1), -10);
        assert_eq!(params.gap_run_cost(4), -16);
    }

    #[test]
    fn test_check_range() {
        let params = ScoreParams::default();
        assert!(params.check_range(1_000, 1_000).is_ok());
        assert!(params.check_range(0, 0).is_ok());

        let limit = SCORE_LIMIT as i32;
        let edge = ScoreParams::new(1, -1, -(limit / 3), -1);
        assert!(edge.check_range(1, 2).is_ok());
        assert!(matches!(
            edge.check_range(2, 2),
            Err(AlignerError::InvalidInput(_))
        ));

        let huge = ScoreParams::new(20, -10, i32::MIN, i32::MIN);
        assert!(huge.check_range(1, 1).is_err());
        // Long inputs overflow the range even with small penalties.
        assert!(ScoreParams::new(20, -1_000_000, -5, -5)
            .check_range(1_000, 1_000)
            .is_err());
    }

    #[test]
    fn test_identity() {
        let stats = AlignmentStats {
            matches: 3,
            mismatches: 1,
            gaps: 0,
            ..Default::default()
        };
        assert_eq!(stats.identity(), 0.75);
        assert_eq!(AlignmentStats::default().identity(), 0.0);
    }
}

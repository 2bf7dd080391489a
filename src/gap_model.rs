use serde::{Deserialize, Serialize};

use crate::gap_state::Direction;
use crate::AlignerError;

/// How open-vs-extend is decided for gap moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapModel {
    /// Three parallel matrices (Gotoh). Open/extend follows the actual path.
    #[default]
    ThreeMatrix,
    /// Single score matrix plus a per-cell gap state. A gap move extends only
    /// if the source cell's recorded winner was a gap in the same direction.
    NeighborState,
}

/// One step through the DP grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Move {
    Diagonal,
    Vertical,
    Horizontal,
}

impl Move {
    pub fn gap_direction(self) -> Option<Direction> {
        match self {
            Move::Diagonal => None,
            Move::Vertical => Some(Direction::Vertical),
            Move::Horizontal => Some(Direction::Horizontal),
        }
    }

    const fn slot(self) -> usize {
        match self {
            Move::Diagonal => 0,
            Move::Vertical => 1,
            Move::Horizontal => 2,
        }
    }
}

/// Candidate values for the three moves of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidates {
    pub diagonal: i32,
    pub vertical: i32,
    pub horizontal: i32,
}

impl Candidates {
    pub fn get(&self, mv: Move) -> i32 {
        match mv {
            Move::Diagonal => self.diagonal,
            Move::Vertical => self.vertical,
            Move::Horizontal => self.horizontal,
        }
    }

    pub fn max(&self) -> i32 {
        self.diagonal.max(self.vertical).max(self.horizontal)
    }
}

/// Priority order among equally scoring moves.
///
/// Both the fill and the traceback consult the same order, so a traceback
/// always retraces a path the fill could have chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Move; 3]", into = "[Move; 3]")]
pub struct TieBreak {
    order: [Move; 3],
}

impl Default for TieBreak {
    fn default() -> Self {
        Self {
            order: [Move::Diagonal, Move::Vertical, Move::Horizontal],
        }
    }
}

impl TieBreak {
    pub fn new(order: [Move; 3]) -> Result<Self, AlignerError> {
        let mut seen = [false; 3];
        for mv in order {
            if std::mem::replace(&mut seen[mv.slot()], true) {
                return Err(AlignerError::InvalidInput(format!(
                    "tie-break order {order:?} lists {mv:?} more than once"
                )));
            }
        }
        Ok(Self { order })
    }

    pub fn order(&self) -> [Move; 3] {
        self.order
    }

    /// First move in priority order attaining the maximum.
    pub fn pick(&self, candidates: &Candidates) -> (Move, i32) {
        let best = candidates.max();
        let winner = self
            .order
            .into_iter()
            .find(|mv| candidates.get(*mv) == best)
            .unwrap_or(self.order[0]);
        (winner, best)
    }

    /// First move in priority order whose candidate equals `target`.
    pub fn find(&self, candidates: &Candidates, target: i32) -> Option<Move> {
        self.order
            .into_iter()
            .find(|mv| candidates.get(*mv) == target)
    }
}

impl TryFrom<[Move; 3]> for TieBreak {
    type Error = AlignerError;

    fn try_from(order: [Move; 3]) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<TieBreak> for [Move; 3] {
    fn from(tie_break: TieBreak) -> Self {
        tie_break.order
    }
}

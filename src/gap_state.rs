//! Per-cell record of the gap move that produced each score.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Consumes a symbol of A only (gap in B).
    Horizontal,
    /// Consumes a symbol of B only (gap in A).
    Vertical,
}

impl Direction {
    const fn bit(self) -> u8 {
        match self {
            Direction::Horizontal => 0b01,
            Direction::Vertical => 0b10,
        }
    }
}

/// Whether a cell was entered by a gap move, and in which direction(s).
///
/// The direction set can only ever hold `Horizontal` and `Vertical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapState {
    is_gap: bool,
    directions: u8,
}

impl GapState {
    /// Not a gap cell.
    pub const UNSET: GapState = GapState {
        is_gap: false,
        directions: 0,
    };

    pub fn gap(direction: Direction) -> Self {
        Self {
            is_gap: true,
            directions: direction.bit(),
        }
    }

    pub fn is_gap(&self) -> bool {
        self.is_gap
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.directions & direction.bit() != 0
    }

    /// A gap move in `direction` out of this cell continues an existing gap.
    pub fn extends(&self, direction: Direction) -> bool {
        self.is_gap && self.contains(direction)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapStateMatrix {
    data: Vec<GapState>,
    rows: usize,
    cols: usize,
}

impl GapStateMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![GapState::UNSET; rows * cols],
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

    pub fn set(&mut self, row: usize, col: usize, state: GapState) {
        self.data[row * self.cols + col] = state;
    }

    pub fn get(&self, row: usize, col: usize) -> GapState {
        self.data[row * self.cols + col]
    }

    pub(crate) fn reset(&mut self) {
        self.data.fill(GapState::UNSET);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_state() {
        let state = GapState::default();
        assert_eq!(state, GapState::UNSET);
        assert!(!state.is_gap());
        assert!(!state.extends(Direction::Horizontal));
        assert!(!state.contains(Direction::Horizontal));
        assert!(!state.contains(Direction::Vertical));
    }

    #[test]
    fn test_gap_state_directions() {
        let state = GapState::gap(Direction::Vertical);
        assert!(state.is_gap());
        assert!(state.contains(Direction::Vertical));
        assert!(state.extends(Direction::Vertical));
        assert!(!state.contains(Direction::Horizontal));
        assert!(!state.extends(Direction::Horizontal));
    }

    #[test]
    fn test_matrix_get_set() {
        let mut states = GapStateMatrix::new(3, 4);
        assert_eq!(states.dims(), (3, 4));
        states.set(2, 3, GapState::gap(Direction::Horizontal));
        assert!(states.get(2, 3).extends(Direction::Horizontal));
        assert_eq!(states.get(2, 0), GapState::UNSET);

        states.reset();
        assert_eq!(states.get(2, 3), GapState::UNSET);
    }

    #[test]
    #[should_panic]
    fn test_matrix_out_of_bounds() {
        let states = GapStateMatrix::new(2, 2);
        states.get(2, 2);
    }
}

//! Highlighted cells are always legal destinations.

use super::super::Board;
use super::Invariant;

/// Invariant: no highlighted cell is occupied.
pub struct HighlightsVacantInvariant;

impl Invariant<Board> for HighlightsVacantInvariant {
    fn holds(board: &Board) -> bool {
        board
            .grid()
            .highlighted()
            .iter()
            .all(|coord| board.grid().occupant(*coord).is_none())
    }

    fn description() -> &'static str {
        "Highlighted cells are vacant"
    }
}

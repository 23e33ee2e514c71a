//! Occupancy invariants: one token per cell, tokens and cells agree.

use super::super::Board;
use super::Invariant;
use std::collections::HashSet;

/// Invariant: at most one token claims any cell.
pub struct UniqueOccupancyInvariant;

impl Invariant<Board> for UniqueOccupancyInvariant {
    fn holds(board: &Board) -> bool {
        let mut seen = HashSet::new();
        board.tokens().all(|token| seen.insert(*token.cell()))
    }

    fn description() -> &'static str {
        "At most one token occupies a cell"
    }
}

/// Invariant: every token's cell names it as occupant, and every occupied
/// cell names a token standing there.
pub struct TokenCellAgreementInvariant;

impl Invariant<Board> for TokenCellAgreementInvariant {
    fn holds(board: &Board) -> bool {
        let tokens_agree = board
            .tokens()
            .all(|token| board.grid().occupant(*token.cell()) == Some(*token.id()));
        let cells_agree = board.grid().cells().all(|cell| match cell.occupant() {
            Some(id) => board.token(*id).map(|t| t.cell()) == Some(cell.coord()),
            None => true,
        });
        tokens_agree && cells_agree
    }

    fn description() -> &'static str {
        "Token positions and cell occupants agree"
    }
}

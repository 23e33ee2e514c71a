//! Contract-based validation for committed moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! `{P(board, placement)} commit {Q(before, after)}`.

use super::Board;
use super::action::{MoveError, MoveRequest, Placement};
use super::invariants::{BoardInvariants, InvariantSet};
use super::rules;
use tracing::instrument;

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// Contract for pre-kickoff placements.
///
/// Preconditions:
/// - Token exists and stands on a cell
/// - Target resolves to a cell
/// - Same-half, kickoff-circle and vacancy rules pass
///
/// Postconditions:
/// - Roster size unchanged
/// - All board invariants hold
pub struct PlacementContract;

impl PlacementContract {
    /// Resolves a placement into a borrowed request against the board.
    pub fn request<'a>(
        board: &'a Board,
        placement: &Placement,
    ) -> Result<MoveRequest<'a>, MoveError> {
        let token = board.token(placement.token).ok_or_else(|| {
            MoveError::InvariantViolation(format!("token {} is not on the board", placement.token))
        })?;
        let origin = board.grid().cell_at(*token.cell()).ok_or_else(|| {
            MoveError::InvariantViolation(format!("{} stands off the grid", token.id()))
        })?;
        Ok(MoveRequest::placement(
            token,
            origin,
            board.grid().cell_at(placement.target),
        ))
    }
}

impl Contract<Board, Placement> for PlacementContract {
    #[instrument(skip(board), fields(placement = %placement))]
    fn pre(board: &Board, placement: &Placement) -> Result<(), MoveError> {
        let request = Self::request(board, placement)?;
        rules::validate(&request)
    }

    fn post(before: &Board, after: &Board) -> Result<(), MoveError> {
        if before.tokens().count() != after.tokens().count() {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: roster size changed".to_string(),
            ));
        }
        BoardInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

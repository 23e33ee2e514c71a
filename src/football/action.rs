//! Move requests and their rejection reasons.
//!
//! A request is built per attempted move, validated, and discarded. It
//! borrows the acting token and the cells involved; nothing in it is owned.

use super::grid::Cell;
use super::hex::HexCoord;
use super::types::{PenaltyBox, Token, TokenId};
use serde::{Deserialize, Serialize};

/// A zone a move may be barred from entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Zone {
    /// The kickoff circle (attackers exempt).
    #[display("kickoff circle")]
    KickoffCircle,
    /// One of the penalty boxes.
    #[display("{} penalty box", _0)]
    PenaltyBox(PenaltyBox),
}

/// An attempted relocation of one token.
#[derive(Debug, Clone, Copy)]
pub struct MoveRequest<'a> {
    /// The token being moved.
    pub token: &'a Token,
    /// The cell the token currently stands on.
    pub origin: &'a Cell,
    /// The requested destination; `None` when the caller could not resolve it.
    pub target: Option<&'a Cell>,
    /// Whether the move must stay within the token's half.
    pub requires_same_half: bool,
    /// Zone the move may not enter.
    pub forbidden_zone: Option<Zone>,
}

impl<'a> MoveRequest<'a> {
    /// A pre-kickoff placement: same half, kickoff circle off limits.
    pub fn placement(token: &'a Token, origin: &'a Cell, target: Option<&'a Cell>) -> Self {
        Self {
            token,
            origin,
            target,
            requires_same_half: true,
            forbidden_zone: Some(Zone::KickoffCircle),
        }
    }

    /// An unconstrained step (e.g. a goalkeeper's free move).
    pub fn step(token: &'a Token, origin: &'a Cell, target: Option<&'a Cell>) -> Self {
        Self {
            token,
            origin,
            target,
            requires_same_half: false,
            forbidden_zone: None,
        }
    }

    /// Returns the target cell or an invariant violation.
    pub fn target_cell(&self) -> Result<&'a Cell, MoveError> {
        self.target.ok_or_else(|| {
            MoveError::InvariantViolation(format!(
                "move of {} has no resolved target cell",
                self.token.id()
            ))
        })
    }
}

/// Why a move was refused. Always user-correctable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum RejectReason {
    /// The target lies in the other half of the board.
    #[display("target is in the opposite half")]
    OppositeHalf,

    /// Only attackers may enter the kickoff circle.
    #[display("only attackers may enter the kickoff circle")]
    KickoffCircle,

    /// The target lies in a forbidden penalty box.
    #[display("target is inside the {} penalty box", _0)]
    ForbiddenPenaltyBox(PenaltyBox),

    /// Another token stands on the target.
    #[display("cell is occupied by {}", _0)]
    Occupied(TokenId),

    /// The target is not one of the highlighted cells.
    #[display("cell {} is not a highlighted option", _0)]
    NotHighlighted(HexCoord),

    /// No attacker stands on the kickoff cell.
    #[display("no attacker on the kickoff cell {}", _0)]
    NoKickoffTaker(HexCoord),

    /// The token is still moving from an earlier request.
    #[display("{} is already moving", _0)]
    RelocationInFlight(TokenId),
}

/// Error that can occur when validating a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// A rule refused the move.
    #[display("Move rejected: {}", _0)]
    Rejected(RejectReason),

    /// The request itself was malformed.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

impl From<RejectReason> for MoveError {
    fn from(reason: RejectReason) -> Self {
        MoveError::Rejected(reason)
    }
}

/// Intent to move a token onto a cell, before it is resolved against the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Placement {
    /// The token to move.
    pub token: TokenId,
    /// Where it should go.
    pub target: HexCoord,
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.token, self.target)
    }
}

//! Penalty-box and occupancy rules.

use super::super::action::{MoveError, MoveRequest, RejectReason, Zone};
use tracing::instrument;

/// Rejects a move into a penalty box the request forbids.
pub struct PenaltyBoxRule;

impl PenaltyBoxRule {
    /// Checks the rule.
    #[instrument(skip(request), fields(token = %request.token.id()))]
    pub fn check(request: &MoveRequest<'_>) -> Result<(), MoveError> {
        let Some(Zone::PenaltyBox(forbidden)) = request.forbidden_zone else {
            return Ok(());
        };
        let target = request.target_cell()?;
        if *target.penalty_box() == forbidden {
            Err(RejectReason::ForbiddenPenaltyBox(forbidden).into())
        } else {
            Ok(())
        }
    }
}

/// Rejects a move onto a cell another token already occupies.
pub struct VacancyRule;

impl VacancyRule {
    /// Checks the rule.
    #[instrument(skip(request), fields(token = %request.token.id()))]
    pub fn check(request: &MoveRequest<'_>) -> Result<(), MoveError> {
        let target = request.target_cell()?;
        match target.occupant() {
            Some(occupant) if occupant != request.token.id() => {
                Err(RejectReason::Occupied(*occupant).into())
            }
            _ => Ok(()),
        }
    }
}

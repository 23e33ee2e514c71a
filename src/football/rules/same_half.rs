//! Same-half rule: placements may not cross the halfway line.

use super::super::action::{MoveError, MoveRequest, RejectReason};
use tracing::instrument;

/// Rejects a move whose origin and target lie on opposite half-signs.
///
/// Cells on the halfway line (`x == 0`) sit in neither half and never
/// trigger the rule.
pub struct SameHalfRule;

impl SameHalfRule {
    /// Checks the rule.
    #[instrument(skip(request), fields(token = %request.token.id()))]
    pub fn check(request: &MoveRequest<'_>) -> Result<(), MoveError> {
        if !request.requires_same_half {
            return Ok(());
        }
        let target = request.target_cell()?;
        if request.origin.coord().opposite_half(*target.coord()) {
            Err(RejectReason::OppositeHalf.into())
        } else {
            Ok(())
        }
    }
}
